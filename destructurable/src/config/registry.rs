//! Immutable per-type rule sets and the registry that holds them.

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt,
    sync::Arc,
};

use super::rule::{FieldRule, Snapshot};
use crate::entity::EntityLayout;

/// A condition evaluated against the whole entity.
pub type Predicate = Arc<dyn Fn(&dyn Any) -> bool + Send + Sync>;

fn applies(predicate: Option<&Predicate>, entity: &dyn Any) -> bool {
    predicate.is_none_or(|predicate| predicate(entity))
}

/// A field rule with its output name and optional condition.
#[derive(Clone)]
pub struct SimpleRule {
    pub(crate) rule: FieldRule,
    pub(crate) alias: String,
    pub(crate) predicate: Option<Predicate>,
}

impl SimpleRule {
    /// Returns the rule.
    pub fn rule(&self) -> &FieldRule {
        &self.rule
    }

    /// Returns the output name.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Returns `true` when the rule has no condition or its condition holds.
    pub fn applies_to(&self, entity: &dyn Any) -> bool {
        applies(self.predicate.as_ref(), entity)
    }
}

impl fmt::Debug for SimpleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleRule")
            .field("rule", &self.rule)
            .field("alias", &self.alias)
            .field("conditional", &self.predicate.is_some())
            .finish()
    }
}

/// A field rendered with its own rule set.
#[derive(Clone)]
pub struct NestedRule {
    pub(crate) config: EntityConfig,
    pub(crate) alias: String,
    pub(crate) predicate: Option<Predicate>,
}

impl NestedRule {
    /// Returns the rule set of the nested entity.
    pub fn config(&self) -> &EntityConfig {
        &self.config
    }

    /// Returns the output name.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Returns `true` when the rule has no condition or its condition holds.
    pub fn applies_to(&self, entity: &dyn Any) -> bool {
        applies(self.predicate.as_ref(), entity)
    }
}

impl fmt::Debug for NestedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NestedRule")
            .field("config", &self.config)
            .field("alias", &self.alias)
            .field("conditional", &self.predicate.is_some())
            .finish()
    }
}

/// The rule configured for one field.
#[derive(Clone, Debug)]
pub enum FieldConfig {
    Simple(SimpleRule),
    Nested(NestedRule),
}

impl FieldConfig {
    /// Returns the output name.
    pub fn alias(&self) -> &str {
        match self {
            Self::Simple(rule) => rule.alias(),
            Self::Nested(rule) => rule.alias(),
        }
    }

    pub(crate) fn set_alias(&mut self, alias: String) {
        match self {
            Self::Simple(rule) => rule.alias = alias,
            Self::Nested(rule) => rule.alias = alias,
        }
    }

    pub(crate) fn set_predicate(&mut self, predicate: Predicate) {
        match self {
            Self::Simple(rule) => rule.predicate = Some(predicate),
            Self::Nested(rule) => rule.predicate = Some(predicate),
        }
    }
}

/// The rule set of one entity type.
#[derive(Clone)]
pub struct EntityConfig {
    pub(crate) type_name: &'static str,
    pub(crate) type_id: TypeId,
    pub(crate) transform: Option<Snapshot>,
    pub(crate) fields: HashMap<&'static str, FieldConfig>,
    pub(crate) layout: EntityLayout,
}

impl EntityConfig {
    /// Returns the configured type's name.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the configured type's `TypeId`.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the whole-entity snapshot, if configured.
    pub fn transform(&self) -> Option<Snapshot> {
        self.transform
    }

    /// Returns the rule for a field.
    pub fn field(&self, name: &str) -> Option<&FieldConfig> {
        self.fields.get(name)
    }

    /// Returns the flattened field layout of the configured type.
    pub fn layout(&self) -> &EntityLayout {
        &self.layout
    }
}

impl fmt::Debug for EntityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<_> = self.fields.iter().collect();
        fields.sort_unstable_by_key(|(name, _)| **name);
        f.debug_struct("EntityConfig")
            .field("type_name", &self.type_name)
            .field("transform", &self.transform)
            .field("fields", &fields)
            .finish_non_exhaustive()
    }
}

/// Rule sets keyed by exact runtime type.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    entries: HashMap<TypeId, EntityConfig>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a rule set, replacing any earlier one for the same type.
    pub fn register(&mut self, config: EntityConfig) {
        self.entries.insert(config.type_id, config);
    }

    /// Returns the rule set for a type.
    pub fn lookup(&self, type_id: TypeId) -> Option<&EntityConfig> {
        self.entries.get(&type_id)
    }

    /// Returns the number of configured types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no type is configured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entity::{Entity, EntityDef},
        tree::{OpaqueValue, Scalar},
        value::{Destructure, Value},
    };

    #[derive(Clone)]
    struct Empty;

    impl Destructure for Empty {
        fn value(&self) -> Value<'_> {
            Value::Entity(self)
        }

        fn capture(&self) -> Scalar {
            Scalar::Opaque(OpaqueValue::new(self.clone()))
        }

        fn display_string(&self) -> String {
            "Empty".into()
        }
    }

    impl Entity for Empty {
        fn definition() -> EntityDef {
            EntityDef::new("Empty")
        }

        fn entity_definition(&self) -> EntityDef {
            Self::definition()
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_destructure(&self) -> &dyn Destructure {
            self
        }
    }

    fn config(transform: Option<Snapshot>) -> EntityConfig {
        EntityConfig {
            type_name: "Empty",
            type_id: TypeId::of::<Empty>(),
            transform,
            fields: HashMap::new(),
            layout: EntityLayout::of::<Empty>(),
        }
    }

    #[test]
    fn lookup_by_exact_type() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());
        registry.register(config(None));
        assert_eq!(registry.len(), 1);
        assert!(registry.lookup(TypeId::of::<Empty>()).is_some());
        assert!(registry.lookup(TypeId::of::<String>()).is_none());
    }

    #[test]
    fn later_registration_replaces_earlier() {
        let mut registry = Registry::new();
        registry.register(config(None));
        registry.register(config(Some(Snapshot::new(true))));
        assert_eq!(registry.len(), 1);
        let entry = registry.lookup(TypeId::of::<Empty>()).unwrap();
        assert_eq!(entry.transform(), Some(Snapshot::new(true)));
    }

    #[test]
    fn predicate_absent_always_applies() {
        let rule = SimpleRule {
            rule: FieldRule::Rename,
            alias: "Alias".into(),
            predicate: None,
        };
        assert!(rule.applies_to(&Empty));

        let never: Predicate = Arc::new(|_: &dyn Any| false);
        let rule = SimpleRule {
            predicate: Some(never),
            ..rule
        };
        assert!(!rule.applies_to(&Empty));
    }
}
