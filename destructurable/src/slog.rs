//! Adapters for emitting destructured values through `slog`.
//!
//! Scalars are emitted through the typed `emit_*` methods of the serializer;
//! sequences and structures are emitted as nested serde values, so drains with
//! nested-value support see the full tree.
//!
//! This module does not configure `slog`. Rule sets live in the
//! [`DestructuringPolicy`] passed at the call site.

use slog::{Key, Record, Result as SlogResult, Serializer, Value as SlogValue};

use crate::{
    policy::DestructuringPolicy,
    tree::{Scalar, StructuredValue},
    value::Destructure,
};

impl SlogValue for StructuredValue {
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        match self {
            Self::Scalar(scalar) => emit_scalar(scalar, key, serializer),
            Self::Sequence(_) | Self::Structure(_) => {
                let nested = slog::Serde(self.clone());
                SlogValue::serialize(&nested, record, key, serializer)
            }
        }
    }
}

fn emit_scalar(scalar: &Scalar, key: Key, serializer: &mut dyn Serializer) -> SlogResult {
    match scalar {
        Scalar::Null => serializer.emit_none(key),
        Scalar::Bool(value) => serializer.emit_bool(key, *value),
        Scalar::I64(value) => serializer.emit_i64(key, *value),
        Scalar::U64(value) => serializer.emit_u64(key, *value),
        Scalar::F64(value) => serializer.emit_f64(key, *value),
        Scalar::Char(value) => serializer.emit_char(key, *value),
        Scalar::Str(value) => serializer.emit_str(key, value),
        Scalar::Opaque(value) => serializer.emit_str(key, value.text()),
    }
}

/// Extension trait for logging values through `slog` under a policy.
///
/// ## Example
/// ```ignore
/// use destructurable::slog::SlogDestructureExt;
///
/// info!(logger, "employee added"; "request" => request.slog_destructured(&policy));
/// ```
pub trait SlogDestructureExt: Destructure + Sized {
    /// Destructures `self` and returns the tree, which implements `slog::Value`.
    fn slog_destructured(&self, policy: &DestructuringPolicy) -> StructuredValue {
        policy.destructure(self)
    }
}

impl<T: Destructure> SlogDestructureExt for T {}
