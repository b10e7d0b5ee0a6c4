//! Rule sets: authoring, validation and the frozen registry.
//!
//! - **`builder`**: the authoring surface (`PolicyBuilder`, `EntityBuilder`, field rule builders)
//! - **`rule`**: field rules and how each one renders a value
//! - **`registry`**: immutable per-type rule sets keyed by `TypeId`
//! - **`error`**: authoring errors reported by `PolicyBuilder::build`

mod builder;
mod error;
mod registry;
mod rule;

pub use builder::{
    AliasBuilder, ApplyConfiguration, ConditionBuilder, EntityBuilder, EntityConfiguration,
    FieldBuilder, PolicyBuilder,
};
pub use error::ConfigError;
pub use registry::{EntityConfig, FieldConfig, NestedRule, Predicate, Registry, SimpleRule};
pub use rule::{FieldDestructor, FieldRule, Snapshot};
