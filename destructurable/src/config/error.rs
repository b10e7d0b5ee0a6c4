use thiserror::Error;

/// Authoring errors reported by [`PolicyBuilder::build`](super::PolicyBuilder::build).
///
/// Only the first error recorded while authoring rule sets is reported.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("`{entity}`: nested field path `{path}` is not supported, configure the nested entity instead")]
    NestedFieldPath { entity: &'static str, path: String },

    #[error("`{entity}` has no readable field named `{field}`")]
    UnknownField { entity: &'static str, field: String },

    #[error("`{entity}.{field}`: alias must not be blank")]
    BlankAlias {
        entity: &'static str,
        field: &'static str,
    },
}
