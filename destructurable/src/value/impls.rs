//! `Destructure` implementations for primitives and std containers.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque},
    fmt::Display,
    hash::{BuildHasher, Hash},
    sync::Arc,
};

use super::{Destructure, Value};
use crate::tree::{OpaqueValue, Scalar};

// =============================================================================
// Scalars
// =============================================================================

macro_rules! impl_scalar {
    ($variant:ident => $($ty:ty),+ $(,)?) => {
        $(
            impl Destructure for $ty {
                fn value(&self) -> Value<'_> {
                    Value::Scalar(self.capture())
                }

                fn capture(&self) -> Scalar {
                    Scalar::$variant((*self).into())
                }

                fn display_string(&self) -> String {
                    self.to_string()
                }
            }
        )+
    };
}

impl_scalar!(I64 => i8, i16, i32, i64);
impl_scalar!(U64 => u8, u16, u32, u64);
impl_scalar!(F64 => f32, f64);
impl_scalar!(Bool => bool);
impl_scalar!(Char => char);

impl Destructure for isize {
    fn value(&self) -> Value<'_> {
        Value::Scalar(self.capture())
    }

    fn capture(&self) -> Scalar {
        i64::try_from(*self).map_or_else(|_| Scalar::Str(self.to_string()), Scalar::I64)
    }

    fn display_string(&self) -> String {
        self.to_string()
    }
}

impl Destructure for usize {
    fn value(&self) -> Value<'_> {
        Value::Scalar(self.capture())
    }

    fn capture(&self) -> Scalar {
        u64::try_from(*self).map_or_else(|_| Scalar::Str(self.to_string()), Scalar::U64)
    }

    fn display_string(&self) -> String {
        self.to_string()
    }
}

impl Destructure for String {
    fn value(&self) -> Value<'_> {
        Value::Scalar(self.capture())
    }

    fn capture(&self) -> Scalar {
        Scalar::Str(self.clone())
    }

    fn display_string(&self) -> String {
        self.clone()
    }
}

impl Destructure for &'static str {
    fn value(&self) -> Value<'_> {
        Value::Scalar(self.capture())
    }

    fn capture(&self) -> Scalar {
        Scalar::Str((*self).to_string())
    }

    fn display_string(&self) -> String {
        (*self).to_string()
    }
}

impl Destructure for () {
    fn value(&self) -> Value<'_> {
        Value::Scalar(Scalar::Null)
    }

    fn capture(&self) -> Scalar {
        Scalar::Null
    }

    fn display_string(&self) -> String {
        String::new()
    }

    fn is_null(&self) -> bool {
        true
    }
}

// =============================================================================
// Wrappers
// =============================================================================

impl<T: Destructure> Destructure for Option<T> {
    fn value(&self) -> Value<'_> {
        match self {
            Some(value) => value.value(),
            None => Value::Scalar(Scalar::Null),
        }
    }

    fn capture(&self) -> Scalar {
        self.as_ref().map_or(Scalar::Null, Destructure::capture)
    }

    fn display_string(&self) -> String {
        self.as_ref()
            .map_or_else(String::new, Destructure::display_string)
    }

    fn is_null(&self) -> bool {
        self.as_ref().is_none_or(Destructure::is_null)
    }
}

impl<T: Destructure> Destructure for Box<T> {
    fn value(&self) -> Value<'_> {
        (**self).value()
    }

    fn capture(&self) -> Scalar {
        (**self).capture()
    }

    fn display_string(&self) -> String {
        (**self).display_string()
    }

    fn is_null(&self) -> bool {
        (**self).is_null()
    }
}

impl<T: Destructure> Destructure for Arc<T> {
    fn value(&self) -> Value<'_> {
        (**self).value()
    }

    fn capture(&self) -> Scalar {
        match (**self).capture() {
            // Share the allocation instead of cloning the pointee.
            Scalar::Opaque(_) => Scalar::Opaque(OpaqueValue::new(Arc::clone(self))),
            scalar => scalar,
        }
    }

    fn display_string(&self) -> String {
        (**self).display_string()
    }

    fn is_null(&self) -> bool {
        (**self).is_null()
    }
}

// =============================================================================
// Sequences
// =============================================================================

fn erase<T: Destructure>(item: &T) -> &dyn Destructure {
    item
}

fn sequence_text<'a>(items: impl Iterator<Item = &'a dyn Destructure>) -> String {
    let parts: Vec<String> = items.map(Destructure::display_string).collect();
    format!("[{}]", parts.join(", "))
}

macro_rules! impl_sequence {
    ($($container:ident $(: $bound:path)?),+ $(,)?) => {
        $(
            impl<T> Destructure for $container<T>
            where
                T: Destructure + Clone $(+ $bound)?,
            {
                fn value(&self) -> Value<'_> {
                    Value::Sequence(self.iter().map(erase).collect())
                }

                fn capture(&self) -> Scalar {
                    Scalar::Opaque(OpaqueValue::new(self.clone()))
                }

                fn display_string(&self) -> String {
                    sequence_text(self.iter().map(erase))
                }
            }
        )+
    };
}

impl_sequence!(Vec, VecDeque, BTreeSet: Ord);

impl<T, S> Destructure for HashSet<T, S>
where
    T: Destructure + Clone + Eq + Hash,
    S: BuildHasher + Clone + Send + Sync + 'static,
{
    fn value(&self) -> Value<'_> {
        Value::Sequence(self.iter().map(erase).collect())
    }

    fn capture(&self) -> Scalar {
        Scalar::Opaque(OpaqueValue::new(self.clone()))
    }

    fn display_string(&self) -> String {
        sequence_text(self.iter().map(erase))
    }
}

// =============================================================================
// Maps
// =============================================================================

fn entry<'a, K: Display, V: Destructure>((key, value): (&K, &'a V)) -> (String, &'a dyn Destructure) {
    (key.to_string(), value)
}

fn map_text<'a>(entries: impl Iterator<Item = (String, &'a dyn Destructure)>) -> String {
    let parts: Vec<String> = entries
        .map(|(key, value)| format!("{key}: {}", value.display_string()))
        .collect();
    format!("{{{}}}", parts.join(", "))
}

impl<K, V, S> Destructure for HashMap<K, V, S>
where
    K: Display + Clone + Eq + Hash + Send + Sync + 'static,
    V: Destructure + Clone,
    S: BuildHasher + Clone + Send + Sync + 'static,
{
    fn value(&self) -> Value<'_> {
        Value::Map(
            self.iter()
                .map(entry)
                .collect(),
        )
    }

    fn capture(&self) -> Scalar {
        Scalar::Opaque(OpaqueValue::new(self.clone()))
    }

    fn display_string(&self) -> String {
        map_text(
            self.iter()
                .map(entry),
        )
    }
}

impl<K, V> Destructure for BTreeMap<K, V>
where
    K: Display + Clone + Ord + Send + Sync + 'static,
    V: Destructure + Clone,
{
    fn value(&self) -> Value<'_> {
        Value::Map(
            self.iter()
                .map(entry)
                .collect(),
        )
    }

    fn capture(&self) -> Scalar {
        Scalar::Opaque(OpaqueValue::new(self.clone()))
    }

    fn display_string(&self) -> String {
        map_text(
            self.iter()
                .map(entry),
        )
    }
}
