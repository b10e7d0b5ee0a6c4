//! How values present themselves to the destructuring engine.
//!
//! - **`Destructure`**: implemented by every value the engine can walk
//! - **`Value`**: the shape a value exposes (scalar, sequence, map, entity)
//! - **`FieldRef`**: a field read from an entity, borrowed or computed
//!
//! Struct types become entities through `#[derive(Entity)]`; std containers and
//! primitives are covered in `impls`, and optional third-party types in `extras`.

mod extras;
mod impls;

use crate::{entity::Entity, tree::Scalar};

/// A value the destructuring engine can walk.
///
/// Implementations describe the value's shape through [`Destructure::value`].
/// [`Destructure::capture`] freezes the value into an owned [`Scalar`] for
/// snapshot rules, and [`Destructure::display_string`] is the text form used
/// by mutable snapshots and opaque scalars.
pub trait Destructure: Send + Sync + 'static {
    /// Returns the shape of this value.
    fn value(&self) -> Value<'_>;

    /// Freezes this value into an owned scalar.
    ///
    /// Primitive types capture as typed scalars; composite types capture an
    /// owned clone as an opaque scalar.
    fn capture(&self) -> Scalar;

    /// Returns the text form of this value.
    fn display_string(&self) -> String;

    /// Returns `true` when this value is absent (`None`, `()`).
    fn is_null(&self) -> bool {
        matches!(self.value(), Value::Scalar(Scalar::Null))
    }
}

/// The shape a [`Destructure`] value exposes to the engine.
pub enum Value<'a> {
    /// A leaf value.
    Scalar(Scalar),
    /// An ordered collection of values.
    Sequence(Vec<&'a dyn Destructure>),
    /// A keyed collection; keys are already rendered to strings.
    Map(Vec<(String, &'a dyn Destructure)>),
    /// A struct with an enumerable field table.
    Entity(&'a dyn Entity),
}

impl std::fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar(scalar) => f.debug_tuple("Scalar").field(scalar).finish(),
            Self::Sequence(items) => f.debug_tuple("Sequence").field(&items.len()).finish(),
            Self::Map(entries) => f.debug_tuple("Map").field(&entries.len()).finish(),
            Self::Entity(entity) => f
                .debug_tuple("Entity")
                .field(&entity.display_string())
                .finish(),
        }
    }
}

/// A field value read from an entity.
///
/// Stored fields are borrowed from the entity; getters compute an owned value.
pub enum FieldRef<'a> {
    /// A stored field.
    Borrowed(&'a dyn Destructure),
    /// A computed value.
    Owned(Box<dyn Destructure>),
    /// The accessor could not reach the field.
    Null,
}

impl<'a> FieldRef<'a> {
    /// Wraps a reference to a stored field.
    pub fn borrowed<T: Destructure>(value: &'a T) -> Self {
        Self::Borrowed(value)
    }

    /// Wraps a computed value.
    pub fn owned<T: Destructure>(value: T) -> Self {
        Self::Owned(Box::new(value))
    }

    /// Returns the field value; an unreachable field reads as `()`.
    pub fn get(&self) -> &dyn Destructure {
        match self {
            Self::Borrowed(value) => *value,
            Self::Owned(value) => value.as_ref(),
            Self::Null => &(),
        }
    }
}

impl std::fmt::Debug for FieldRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FieldRef")
            .field(&self.get().display_string())
            .finish()
    }
}
