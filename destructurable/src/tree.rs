//! The structured value tree produced by the engine.
//!
//! A tree is a [`StructuredValue`]: a scalar leaf, an ordered sequence, or a
//! [`Structure`] of named properties with an optional type tag. Trees are
//! owned by the caller and independent of the source value.
//!
//! `Display` renders a compact, human-readable form:
//!
//! ```text
//! EmployeeAddRequest { FirstName: "Ann", Passport: "******", Tags: ["a", "b"] }
//! ```
//!
//! With the `json` feature the tree also serializes through serde, with the
//! type tag emitted as a leading `"$type"` entry.

use std::{
    any::Any,
    fmt,
    sync::{Arc, OnceLock},
};

use crate::value::Destructure;

/// Key under which a structure's type tag is serialized.
pub const TYPE_TAG_KEY: &str = "$type";

// =============================================================================
// StructuredValue
// =============================================================================

/// A node of the output tree.
#[derive(Clone, Debug, PartialEq)]
pub enum StructuredValue {
    /// A leaf value.
    Scalar(Scalar),
    /// An ordered collection.
    Sequence(Vec<StructuredValue>),
    /// Named properties with an optional type tag.
    Structure(Structure),
}

impl StructuredValue {
    /// The null scalar.
    pub const NULL: Self = Self::Scalar(Scalar::Null);

    /// Returns `true` for the null scalar.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Scalar(Scalar::Null))
    }

    /// Returns the scalar, if this node is one.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Returns the string content of a `Str` scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::Str(text)) => Some(text),
            _ => None,
        }
    }

    /// Returns the elements, if this node is a sequence.
    pub fn as_sequence(&self) -> Option<&[StructuredValue]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the structure, if this node is one.
    pub fn as_structure(&self) -> Option<&Structure> {
        match self {
            Self::Structure(structure) => Some(structure),
            _ => None,
        }
    }
}

impl From<Scalar> for StructuredValue {
    fn from(scalar: Scalar) -> Self {
        Self::Scalar(scalar)
    }
}

impl From<Structure> for StructuredValue {
    fn from(structure: Structure) -> Self {
        Self::Structure(structure)
    }
}

impl fmt::Display for StructuredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(scalar) => fmt::Display::fmt(scalar, f),
            Self::Sequence(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    fmt::Display::fmt(item, f)?;
                }
                f.write_str("]")
            }
            Self::Structure(structure) => fmt::Display::fmt(structure, f),
        }
    }
}

// =============================================================================
// Structure
// =============================================================================

/// A named property of a [`Structure`].
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    /// Output name: the field name or its alias.
    pub name: String,
    /// Output value.
    pub value: StructuredValue,
}

impl Property {
    /// Creates a property.
    pub fn new(name: impl Into<String>, value: StructuredValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// An ordered list of properties, optionally tagged with a type name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Structure {
    type_tag: Option<String>,
    properties: Vec<Property>,
}

impl Structure {
    /// Creates a structure.
    pub fn new(type_tag: Option<String>, properties: Vec<Property>) -> Self {
        Self {
            type_tag,
            properties,
        }
    }

    /// Returns the type tag.
    pub fn type_tag(&self) -> Option<&str> {
        self.type_tag.as_deref()
    }

    /// Returns the properties in output order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Returns the first property value with the given name.
    pub fn get(&self, name: &str) -> Option<&StructuredValue> {
        self.properties
            .iter()
            .find(|property| property.name == name)
            .map(|property| &property.value)
    }

    /// Returns the property names in output order.
    pub fn names(&self) -> Vec<&str> {
        self.properties
            .iter()
            .map(|property| property.name.as_str())
            .collect()
    }

    /// Returns the number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` when the structure has no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = &self.type_tag {
            write!(f, "{tag} ")?;
        }
        if self.properties.is_empty() {
            return f.write_str("{}");
        }
        f.write_str("{ ")?;
        for (index, property) in self.properties.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", property.name, property.value)?;
        }
        f.write_str(" }")
    }
}

// =============================================================================
// Scalar
// =============================================================================

/// A leaf value.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    /// An absent value.
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    Char(char),
    Str(String),
    /// A frozen copy of a value that has no primitive representation.
    Opaque(OpaqueValue),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::I64(value) => write!(f, "{value}"),
            Self::U64(value) => write!(f, "{value}"),
            Self::F64(value) => write!(f, "{value}"),
            Self::Char(value) => write!(f, "{value:?}"),
            Self::Str(value) => write!(f, "{value:?}"),
            Self::Opaque(value) => f.write_str(value.text()),
        }
    }
}

/// A frozen, owned copy of a [`Destructure`] value.
///
/// The copy is shared, so cloning an `OpaqueValue` is cheap. Its text form is
/// computed the first time it is rendered and cached afterwards.
#[derive(Clone)]
pub struct OpaqueValue(Arc<OpaqueInner>);

struct OpaqueInner {
    value: Box<dyn Captured>,
    text: OnceLock<String>,
}

trait Captured: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn render(&self) -> String;
}

impl<T: Destructure> Captured for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn render(&self) -> String {
        self.display_string()
    }
}

impl OpaqueValue {
    /// Freezes `value`.
    pub fn new<T: Destructure>(value: T) -> Self {
        Self(Arc::new(OpaqueInner {
            value: Box::new(value),
            text: OnceLock::new(),
        }))
    }

    /// Returns the text form of the frozen value.
    pub fn text(&self) -> &str {
        self.0.text.get_or_init(|| self.0.value.render())
    }

    /// Returns the frozen value if it is a `T`.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.value.as_any().downcast_ref::<T>()
    }
}

impl PartialEq for OpaqueValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.text() == other.text()
    }
}

impl fmt::Debug for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OpaqueValue").field(&self.text()).finish()
    }
}

// =============================================================================
// Serde
// =============================================================================

#[cfg(feature = "json")]
mod json {
    use serde::ser::{Serialize, SerializeMap, Serializer};
    use serde_json::{Map, Number, Value as JsonValue};

    use super::{Scalar, Structure, StructuredValue, TYPE_TAG_KEY};

    impl Serialize for StructuredValue {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Self::Scalar(scalar) => scalar.serialize(serializer),
                Self::Sequence(items) => serializer.collect_seq(items),
                Self::Structure(structure) => structure.serialize(serializer),
            }
        }
    }

    impl Serialize for Structure {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let len = self.properties.len() + usize::from(self.type_tag.is_some());
            let mut map = serializer.serialize_map(Some(len))?;
            if let Some(tag) = &self.type_tag {
                map.serialize_entry(TYPE_TAG_KEY, tag)?;
            }
            for property in &self.properties {
                map.serialize_entry(&property.name, &property.value)?;
            }
            map.end()
        }
    }

    impl Serialize for Scalar {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Self::Null => serializer.serialize_unit(),
                Self::Bool(value) => serializer.serialize_bool(*value),
                Self::I64(value) => serializer.serialize_i64(*value),
                Self::U64(value) => serializer.serialize_u64(*value),
                Self::F64(value) => serializer.serialize_f64(*value),
                Self::Char(value) => serializer.serialize_char(*value),
                Self::Str(value) => serializer.serialize_str(value),
                Self::Opaque(value) => serializer.serialize_str(value.text()),
            }
        }
    }

    impl StructuredValue {
        /// Converts the tree into a `serde_json::Value`.
        ///
        /// Non-finite floats become `null`. Duplicate property names keep the
        /// last value.
        pub fn to_json(&self) -> JsonValue {
            match self {
                Self::Scalar(scalar) => scalar_to_json(scalar),
                Self::Sequence(items) => {
                    JsonValue::Array(items.iter().map(StructuredValue::to_json).collect())
                }
                Self::Structure(structure) => {
                    let mut map = Map::new();
                    if let Some(tag) = structure.type_tag() {
                        map.insert(TYPE_TAG_KEY.to_string(), JsonValue::String(tag.to_string()));
                    }
                    for property in structure.properties() {
                        map.insert(property.name.clone(), property.value.to_json());
                    }
                    JsonValue::Object(map)
                }
            }
        }
    }

    fn scalar_to_json(scalar: &Scalar) -> JsonValue {
        match scalar {
            Scalar::Null => JsonValue::Null,
            Scalar::Bool(value) => JsonValue::Bool(*value),
            Scalar::I64(value) => JsonValue::from(*value),
            Scalar::U64(value) => JsonValue::from(*value),
            Scalar::F64(value) => Number::from_f64(*value).map_or(JsonValue::Null, JsonValue::Number),
            Scalar::Char(value) => JsonValue::String(value.to_string()),
            Scalar::Str(value) => JsonValue::String(value.clone()),
            Scalar::Opaque(value) => JsonValue::String(value.text().to_string()),
        }
    }
}

// =============================================================================
// Valuable
// =============================================================================

#[cfg(feature = "tracing-valuable")]
mod valuable_impls {
    use valuable::{Mappable, Valuable, Value, Visit};

    use super::{Scalar, Structure, StructuredValue, TYPE_TAG_KEY};

    impl Valuable for StructuredValue {
        fn as_value(&self) -> Value<'_> {
            match self {
                Self::Scalar(scalar) => scalar.as_value(),
                Self::Sequence(items) => Value::Listable(items),
                Self::Structure(structure) => Value::Mappable(structure),
            }
        }

        fn visit(&self, visit: &mut dyn Visit) {
            match self {
                Self::Scalar(scalar) => scalar.visit(visit),
                Self::Sequence(items) => items.visit(visit),
                Self::Structure(structure) => structure.visit(visit),
            }
        }
    }

    impl Valuable for Structure {
        fn as_value(&self) -> Value<'_> {
            Value::Mappable(self)
        }

        fn visit(&self, visit: &mut dyn Visit) {
            if let Some(tag) = &self.type_tag {
                visit.visit_entry(Value::String(TYPE_TAG_KEY), Value::String(tag));
            }
            for property in &self.properties {
                visit.visit_entry(Value::String(&property.name), property.value.as_value());
            }
        }
    }

    impl Mappable for Structure {
        fn size_hint(&self) -> (usize, Option<usize>) {
            let len = self.properties.len() + usize::from(self.type_tag.is_some());
            (len, Some(len))
        }
    }

    impl Valuable for Scalar {
        fn as_value(&self) -> Value<'_> {
            match self {
                Self::Null => Value::Unit,
                Self::Bool(value) => Value::Bool(*value),
                Self::I64(value) => Value::I64(*value),
                Self::U64(value) => Value::U64(*value),
                Self::F64(value) => Value::F64(*value),
                Self::Char(value) => Value::Char(*value),
                Self::Str(value) => Value::String(value),
                Self::Opaque(value) => Value::String(value.text()),
            }
        }

        fn visit(&self, visit: &mut dyn Visit) {
            visit.visit_value(self.as_value());
        }
    }
}
