//! The resolution engine.
//!
//! [`DestructuringPolicy`] owns the frozen registry and global options and
//! walks values depth-first. Entities are resolved by exact runtime type; an
//! unconfigured entity renders every enumerated field, and a configured one
//! consults its rule set field by field.

use crate::{
    config::{EntityConfig, FieldConfig, PolicyBuilder, Registry},
    entity::{Entity, EntityLayout, entity_type_id},
    tree::{Property, Structure, StructuredValue},
    value::{Destructure, Value},
};

/// Global options of a policy.
///
/// Both default to `false`. With the `json` feature the options can be read
/// from host configuration:
///
/// ```rust
/// # #[cfg(feature = "json")] {
/// use destructurable::PolicyOptions;
///
/// let options: PolicyOptions = serde_json::from_str(r#"{ "ignore_null_fields": true }"#).unwrap();
/// assert!(options.ignore_null_fields);
/// assert!(!options.omit_type_tag);
/// # }
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct PolicyOptions {
    /// Leave the type tag off every structure.
    pub omit_type_tag: bool,
    /// Skip fields whose value is null, at every depth.
    pub ignore_null_fields: bool,
}

/// A frozen set of rule sets plus global options.
///
/// The policy is immutable, `Send` and `Sync`; build it once and share it.
#[derive(Debug)]
pub struct DestructuringPolicy {
    registry: Registry,
    options: PolicyOptions,
}

impl DestructuringPolicy {
    pub(crate) fn new(registry: Registry, options: PolicyOptions) -> Self {
        Self { registry, options }
    }

    /// Starts authoring a policy.
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::new()
    }

    /// Returns the global options.
    pub fn options(&self) -> PolicyOptions {
        self.options
    }

    /// Returns the frozen registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Converts `value` into a structured tree.
    pub fn destructure(&self, value: &dyn Destructure) -> StructuredValue {
        self.realize(value)
    }

    /// Turns a value into its tree form when no field rule governs it.
    ///
    /// Scalars wrap directly, sequences map element-wise, maps become untagged
    /// structures and entities re-enter the engine.
    pub fn realize(&self, value: &dyn Destructure) -> StructuredValue {
        match value.value() {
            Value::Scalar(scalar) => StructuredValue::Scalar(scalar),
            Value::Sequence(items) => {
                StructuredValue::Sequence(items.into_iter().map(|item| self.realize(item)).collect())
            }
            Value::Map(entries) => StructuredValue::Structure(Structure::new(
                None,
                entries
                    .into_iter()
                    .map(|(key, value)| Property::new(key, self.realize(value)))
                    .collect(),
            )),
            Value::Entity(entity) => self.destructure_entity(entity),
        }
    }

    fn destructure_entity(&self, entity: &dyn Entity) -> StructuredValue {
        match self.registry.lookup(entity_type_id(entity)) {
            Some(config) => self.configured(entity, config),
            None => {
                let layout = EntityLayout::new(entity.entity_definition());
                self.structure(entity, &layout, None)
            }
        }
    }

    fn configured(&self, entity: &dyn Entity, config: &EntityConfig) -> StructuredValue {
        match config.transform() {
            Some(snapshot) => StructuredValue::Scalar(snapshot.capture(entity.as_destructure())),
            None => self.structure(entity, config.layout(), Some(config)),
        }
    }

    fn nested(&self, value: &dyn Destructure, config: &EntityConfig) -> StructuredValue {
        // A whole-entity snapshot of null is null as well.
        if value.is_null() {
            return StructuredValue::NULL;
        }
        match value.value() {
            Value::Entity(entity) if entity_type_id(entity) == config.type_id() => {
                self.configured(entity, config)
            }
            _ => self.realize(value),
        }
    }

    fn structure(
        &self,
        entity: &dyn Entity,
        layout: &EntityLayout,
        config: Option<&EntityConfig>,
    ) -> StructuredValue {
        let target = entity.as_any();
        let mut properties = Vec::with_capacity(layout.fields().len());

        for accessor in layout.fields() {
            let field = accessor.read(target);
            let value = field.get();
            if self.options.ignore_null_fields && value.is_null() {
                continue;
            }

            let name = accessor.name();
            match config.and_then(|config| config.field(name)) {
                None => properties.push(Property::new(name, self.realize(value))),
                Some(FieldConfig::Simple(rule)) => {
                    if !rule.applies_to(target) {
                        properties.push(Property::new(name, self.realize(value)));
                        continue;
                    }
                    match rule.rule().apply(value, self) {
                        Some(rendered) => properties.push(Property::new(rule.alias(), rendered)),
                        None if rule.rule().is_ignore() => {}
                        None => properties.push(Property::new(rule.alias(), self.realize(value))),
                    }
                }
                Some(FieldConfig::Nested(rule)) => {
                    if rule.applies_to(target) {
                        let rendered = self.nested(value, rule.config());
                        properties.push(Property::new(rule.alias(), rendered));
                    } else {
                        properties.push(Property::new(name, self.realize(value)));
                    }
                }
            }
        }

        let type_tag = (!self.options.omit_type_tag).then(|| layout.name().to_string());
        StructuredValue::Structure(Structure::new(type_tag, properties))
    }
}

impl Default for DestructuringPolicy {
    fn default() -> Self {
        Self::new(Registry::new(), PolicyOptions::default())
    }
}
