//! Authoring surface for rule sets.
//!
//! Rule sets are authored once, validated as they are written, and frozen by
//! [`PolicyBuilder::build`]. Field names are checked against the entity's
//! enumerated fields; the first authoring error is kept and reported by
//! `build()`.

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    marker::PhantomData,
    sync::Arc,
};

use super::{
    error::ConfigError,
    registry::{EntityConfig, FieldConfig, NestedRule, Predicate, Registry, SimpleRule},
    rule::{FieldDestructor, FieldRule, Snapshot},
};
use crate::{
    entity::{Accessor, Entity, EntityLayout},
    masking::{DefaultMaskingProcessor, MaskingOptions, MaskingProcessor},
    policy::{DestructuringPolicy, PolicyOptions},
};

// =============================================================================
// PolicyBuilder
// =============================================================================

/// Collects rule sets and global options, then freezes them into a
/// [`DestructuringPolicy`].
#[derive(Debug, Default)]
pub struct PolicyBuilder {
    registry: Registry,
    options: PolicyOptions,
    error: Option<ConfigError>,
}

impl PolicyBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Authors the rule set of `T` inline.
    ///
    /// Authoring the same type again replaces the earlier rule set.
    #[must_use]
    pub fn entity<T: Entity>(mut self, configure: impl FnOnce(&mut EntityBuilder<T>)) -> Self {
        let mut builder = EntityBuilder::new();
        configure(&mut builder);
        match builder.finish() {
            Ok(config) => self.registry.register(config),
            Err(error) => self.record(error),
        }
        self
    }

    /// Applies a rule-set type.
    #[must_use]
    pub fn apply_configuration<C: EntityConfiguration>(self, configuration: &C) -> Self {
        self.entity::<C::Entity>(|builder| configuration.configure(builder))
    }

    /// Applies several rule-set types, in order.
    #[must_use]
    pub fn apply_configurations<I>(self, configurations: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn ApplyConfiguration>>,
    {
        configurations
            .into_iter()
            .fold(self, |builder, configuration| configuration.apply_to(builder))
    }

    /// Omits the type tag from every structure.
    #[must_use]
    pub fn omit_type_tag(mut self, omit: bool) -> Self {
        self.options.omit_type_tag = omit;
        self
    }

    /// Skips fields whose value is null, at every depth.
    #[must_use]
    pub fn ignore_null_fields(mut self, ignore: bool) -> Self {
        self.options.ignore_null_fields = ignore;
        self
    }

    /// Replaces the global options.
    #[must_use]
    pub fn options(mut self, options: PolicyOptions) -> Self {
        self.options = options;
        self
    }

    /// Freezes the authored rule sets.
    ///
    /// Returns the first authoring error, if any was recorded.
    pub fn build(self) -> Result<DestructuringPolicy, ConfigError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(DestructuringPolicy::new(self.registry, self.options)),
        }
    }

    fn record(&mut self, error: ConfigError) {
        self.error.get_or_insert(error);
    }
}

// =============================================================================
// Rule-set types
// =============================================================================

/// A reusable rule set for one entity type.
///
/// ```rust
/// use destructurable::{DestructuringPolicy, Entity, EntityBuilder, EntityConfiguration};
///
/// #[derive(Clone, Entity)]
/// pub struct Card {
///     pub holder: String,
///     pub number: String,
/// }
///
/// struct CardConfiguration;
///
/// impl EntityConfiguration for CardConfiguration {
///     type Entity = Card;
///
///     fn configure(&self, card: &mut EntityBuilder<Card>) {
///         card.field("number").mask();
///     }
/// }
///
/// let policy = DestructuringPolicy::builder()
///     .apply_configuration(&CardConfiguration)
///     .build()
///     .unwrap();
/// # let _ = policy;
/// ```
pub trait EntityConfiguration {
    /// The configured entity type.
    type Entity: Entity;

    /// Authors the rule set.
    fn configure(&self, entity: &mut EntityBuilder<Self::Entity>);
}

/// Object-safe form of [`EntityConfiguration`], for bulk registration.
pub trait ApplyConfiguration {
    /// Applies this rule set to `builder`.
    fn apply_to(&self, builder: PolicyBuilder) -> PolicyBuilder;
}

impl<C: EntityConfiguration> ApplyConfiguration for C {
    fn apply_to(&self, builder: PolicyBuilder) -> PolicyBuilder {
        builder.apply_configuration(self)
    }
}

// =============================================================================
// EntityBuilder
// =============================================================================

/// Authors the rule set of one entity type.
pub struct EntityBuilder<T> {
    layout: EntityLayout,
    transform: Option<Snapshot>,
    fields: HashMap<&'static str, FieldConfig>,
    error: Option<ConfigError>,
    entity: PhantomData<fn(&T)>,
}

impl<T: Entity> EntityBuilder<T> {
    fn new() -> Self {
        Self {
            layout: EntityLayout::of::<T>(),
            transform: None,
            fields: HashMap::new(),
            error: None,
            entity: PhantomData,
        }
    }

    fn finish(self) -> Result<EntityConfig, ConfigError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Ok(EntityConfig {
            type_name: self.layout.name(),
            type_id: TypeId::of::<T>(),
            transform: self.transform,
            fields: self.fields,
            layout: self.layout,
        })
    }

    fn record(&mut self, error: ConfigError) {
        self.error.get_or_insert(error);
    }

    fn resolve(&mut self, name: &str) -> Option<Accessor> {
        if name.contains('.') {
            self.record(ConfigError::NestedFieldPath {
                entity: self.layout.name(),
                path: name.to_string(),
            });
            return None;
        }
        let accessor = self.layout.find(name).cloned();
        if accessor.is_none() {
            self.record(ConfigError::UnknownField {
                entity: self.layout.name(),
                field: name.to_string(),
            });
        }
        accessor
    }

    /// Renders the whole entity as a scalar snapshot; field rules are not consulted.
    pub fn as_scalar(&mut self, mutable: bool) -> &mut Self {
        self.transform = Some(Snapshot::new(mutable));
        self
    }

    /// Selects a field.
    ///
    /// A selected field without a chosen rule renders a placeholder text.
    pub fn field(&mut self, name: &str) -> FieldBuilder<'_, T> {
        let field = self.resolve(name);
        let mut slot = RuleSlot {
            entity: self,
            field,
        };
        slot.set_rule(FieldRule::Unselected);
        FieldBuilder { slot }
    }

    /// Renders a field with its own inline rule set.
    pub fn nested<U: Entity>(
        &mut self,
        name: &str,
        configure: impl FnOnce(&mut EntityBuilder<U>),
    ) -> AliasBuilder<'_, T> {
        let mut field = self.resolve(name);
        if let Some(accessor) = &field {
            let mut child = EntityBuilder::<U>::new();
            configure(&mut child);
            match child.finish() {
                Ok(config) => {
                    self.fields.insert(
                        accessor.name(),
                        FieldConfig::Nested(NestedRule {
                            config,
                            alias: accessor.name().to_string(),
                            predicate: None,
                        }),
                    );
                }
                Err(error) => {
                    self.record(error);
                    field = None;
                }
            }
        }
        AliasBuilder {
            slot: RuleSlot {
                entity: self,
                field,
            },
        }
    }

    /// Renders a field with a rule-set type.
    pub fn nested_with<C: EntityConfiguration>(
        &mut self,
        name: &str,
        configuration: &C,
    ) -> AliasBuilder<'_, T> {
        self.nested::<C::Entity>(name, |child| configuration.configure(child))
    }
}

// =============================================================================
// Field rule builders
// =============================================================================

struct RuleSlot<'b, T> {
    entity: &'b mut EntityBuilder<T>,
    field: Option<Accessor>,
}

impl<T: Entity> RuleSlot<'_, T> {
    fn set_rule(&mut self, rule: FieldRule) {
        if let Some(accessor) = &self.field {
            self.entity.fields.insert(
                accessor.name(),
                FieldConfig::Simple(SimpleRule {
                    rule,
                    alias: accessor.name().to_string(),
                    predicate: None,
                }),
            );
        }
    }

    fn set_alias(&mut self, alias: String) {
        let Some(accessor) = &self.field else {
            return;
        };
        if alias.trim().is_empty() {
            let error = ConfigError::BlankAlias {
                entity: self.entity.layout.name(),
                field: accessor.name(),
            };
            self.entity.record(error);
            return;
        }
        if let Some(config) = self.entity.fields.get_mut(accessor.name()) {
            config.set_alias(alias);
        }
    }

    fn set_predicate(&mut self, predicate: Predicate) {
        if let Some(accessor) = &self.field {
            if let Some(config) = self.entity.fields.get_mut(accessor.name()) {
                config.set_predicate(predicate);
            }
        }
    }

    fn field_is_null(&mut self, expected: bool) {
        if let Some(accessor) = self.field.clone() {
            self.set_predicate(Arc::new(move |entity: &dyn Any| {
                accessor.read(entity).get().is_null() == expected
            }));
        }
    }
}

/// Chooses the rule of a selected field.
pub struct FieldBuilder<'b, T> {
    slot: RuleSlot<'b, T>,
}

impl<'b, T: Entity> FieldBuilder<'b, T> {
    /// Emits the field under another name.
    pub fn rename(mut self, alias: impl Into<String>) -> ConditionBuilder<'b, T> {
        self.slot.set_rule(FieldRule::Rename);
        self.slot.set_alias(alias.into());
        ConditionBuilder { slot: self.slot }
    }

    /// Omits the field.
    pub fn ignore(mut self) -> ConditionBuilder<'b, T> {
        self.slot.set_rule(FieldRule::Ignore);
        ConditionBuilder { slot: self.slot }
    }

    /// Freezes the field value as a scalar.
    ///
    /// A mutable snapshot captures the display string at logging time.
    pub fn as_scalar(self, mutable: bool) -> AliasBuilder<'b, T> {
        self.with_rule(FieldRule::Snapshot(Snapshot::new(mutable)))
    }

    /// Masks the field with the default masking processor.
    pub fn mask(self) -> AliasBuilder<'b, T> {
        self.mask_using(DefaultMaskingProcessor::default())
    }

    /// Masks the field with the default masking processor and custom options.
    pub fn mask_with(self, options: MaskingOptions) -> AliasBuilder<'b, T> {
        self.mask_using(DefaultMaskingProcessor::new(options))
    }

    /// Masks the field with a caller-supplied processor.
    pub fn mask_using(self, processor: impl MaskingProcessor + 'static) -> AliasBuilder<'b, T> {
        self.with_rule(FieldRule::Mask(Arc::new(processor)))
    }

    /// Renders the field with a caller-supplied rule.
    pub fn custom(self, destructor: impl FieldDestructor + 'static) -> AliasBuilder<'b, T> {
        self.with_rule(FieldRule::Custom(Arc::new(destructor)))
    }

    fn with_rule(mut self, rule: FieldRule) -> AliasBuilder<'b, T> {
        self.slot.set_rule(rule);
        AliasBuilder { slot: self.slot }
    }
}

/// Optionally renames the field, then optionally sets a condition.
pub struct AliasBuilder<'b, T> {
    slot: RuleSlot<'b, T>,
}

impl<'b, T: Entity> AliasBuilder<'b, T> {
    /// Emits the field under another name.
    pub fn alias(mut self, alias: impl Into<String>) -> ConditionBuilder<'b, T> {
        self.slot.set_alias(alias.into());
        ConditionBuilder { slot: self.slot }
    }

    /// See [`ConditionBuilder::apply_when`].
    pub fn apply_when<F>(self, predicate: F)
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        ConditionBuilder { slot: self.slot }.apply_when(predicate);
    }

    /// See [`ConditionBuilder::apply_when_null`].
    pub fn apply_when_null(self) {
        ConditionBuilder { slot: self.slot }.apply_when_null();
    }

    /// See [`ConditionBuilder::apply_when_not_null`].
    pub fn apply_when_not_null(self) {
        ConditionBuilder { slot: self.slot }.apply_when_not_null();
    }
}

/// Optionally makes the rule conditional.
///
/// When the condition is false the field is emitted under its own name with
/// its realized value.
pub struct ConditionBuilder<'b, T> {
    slot: RuleSlot<'b, T>,
}

impl<T: Entity> ConditionBuilder<'_, T> {
    /// Applies the rule only when `predicate` holds for the whole entity.
    pub fn apply_when<F>(mut self, predicate: F)
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.slot.set_predicate(Arc::new(move |entity: &dyn Any| {
            entity.downcast_ref::<T>().is_some_and(&predicate)
        }));
    }

    /// Applies the rule only when the field value is null.
    pub fn apply_when_null(mut self) {
        self.slot.field_is_null(true);
    }

    /// Applies the rule only when the field value is not null.
    pub fn apply_when_not_null(mut self) {
        self.slot.field_is_null(false);
    }
}
