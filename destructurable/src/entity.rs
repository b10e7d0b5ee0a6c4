//! Field tables for struct types and guarded field access.
//!
//! `#[derive(Entity)]` describes a struct as an [`EntityDef`]: its name, its
//! readable fields in declaration order, and optionally a base entity reached
//! through a `#[destructure(base)]` field. [`EntityLayout`] flattens that
//! description into a list of [`Accessor`]s, most-derived level first, with
//! names shadowed by a more-derived level removed.
//!
//! Accessors never let a panic escape: a panicking getter produces a
//! placeholder string and a warning on the `destructurable::self_log` target.

use std::{
    any::{Any, TypeId},
    collections::HashSet,
    fmt,
    panic::{AssertUnwindSafe, catch_unwind},
};

use crate::value::{Destructure, FieldRef};

/// Reads one field from an entity passed as `&dyn Any`.
pub type Reader = for<'a> fn(&'a dyn Any) -> FieldRef<'a>;

/// Projects an entity onto its base entity.
pub type Projection = for<'a> fn(&'a dyn Any) -> Option<&'a dyn Any>;

/// A struct type with an enumerable field table.
///
/// Implemented by `#[derive(Entity)]`; hand-written impls are possible but
/// rarely needed.
pub trait Entity: Destructure {
    /// Returns the field table of this type.
    fn definition() -> EntityDef
    where
        Self: Sized;

    /// Returns the field table of the runtime type.
    fn entity_definition(&self) -> EntityDef;

    /// Returns `self` as `&dyn Any`, for field readers and predicates.
    fn as_any(&self) -> &dyn Any;

    /// Returns `self` as `&dyn Destructure`.
    fn as_destructure(&self) -> &dyn Destructure;
}

// =============================================================================
// Definitions
// =============================================================================

/// The field table of one entity level.
#[derive(Clone)]
pub struct EntityDef {
    name: &'static str,
    fields: Vec<FieldDef>,
    base: Option<BaseDef>,
}

impl EntityDef {
    /// Starts a definition for the named type.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
            base: None,
        }
    }

    /// Appends a readable field.
    #[must_use]
    pub fn field(mut self, name: &'static str, read: Reader) -> Self {
        self.fields.push(FieldDef { name, read });
        self
    }

    /// Sets the base entity.
    #[must_use]
    pub fn base(mut self, project: Projection, definition: fn() -> EntityDef) -> Self {
        self.base = Some(BaseDef {
            project,
            definition,
        });
        self
    }

    /// Returns the type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the fields declared at this level.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }
}

impl fmt::Debug for EntityDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityDef")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("base", &self.base.as_ref().map(|base| (base.definition)().name))
            .finish()
    }
}

/// A readable field.
#[derive(Clone, Copy)]
pub struct FieldDef {
    name: &'static str,
    read: Reader,
}

impl FieldDef {
    /// Returns the field name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for FieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// The base entity of a definition.
#[derive(Clone, Copy)]
pub struct BaseDef {
    project: Projection,
    definition: fn() -> EntityDef,
}

// =============================================================================
// Layout
// =============================================================================

/// Guarded access to one field, possibly through a chain of base entities.
#[derive(Clone)]
pub struct Accessor {
    name: &'static str,
    path: Vec<Projection>,
    read: Reader,
}

impl Accessor {
    /// Returns the field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Reads the field from `entity`.
    ///
    /// A panic inside the reader is caught; the field then reads as a
    /// placeholder string describing the panic.
    pub fn read<'a>(&self, entity: &'a dyn Any) -> FieldRef<'a> {
        let result = catch_unwind(AssertUnwindSafe(|| {
            let mut target = entity;
            for project in &self.path {
                match project(target) {
                    Some(next) => target = next,
                    None => return FieldRef::Null,
                }
            }
            (self.read)(target)
        }));

        match result {
            Ok(field) => field,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::warn!(
                    target: "destructurable::self_log",
                    field = self.name,
                    panic = %message,
                    "field accessor panicked"
                );
                FieldRef::owned(format!("The field accessor panicked: '{message}'."))
            }
        }
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("name", &self.name)
            .field("depth", &self.path.len())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("unknown panic")
    }
}

/// The flattened field list of an entity type.
#[derive(Clone, Debug)]
pub struct EntityLayout {
    name: &'static str,
    fields: Vec<Accessor>,
}

impl EntityLayout {
    /// Flattens a definition, most-derived level first.
    pub fn new(definition: EntityDef) -> Self {
        let name = definition.name;
        let mut fields = Vec::new();
        let mut seen = HashSet::new();
        flatten(definition, &[], &mut seen, &mut fields);
        Self { name, fields }
    }

    /// Builds the layout of `T`.
    pub fn of<T: Entity>() -> Self {
        Self::new(T::definition())
    }

    /// Returns the type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the accessors in output order.
    pub fn fields(&self) -> &[Accessor] {
        &self.fields
    }

    /// Finds a field by name.
    pub fn find(&self, name: &str) -> Option<&Accessor> {
        self.fields.iter().find(|accessor| accessor.name == name)
    }
}

fn flatten(
    definition: EntityDef,
    path: &[Projection],
    seen: &mut HashSet<&'static str>,
    out: &mut Vec<Accessor>,
) {
    for field in definition.fields {
        if seen.insert(field.name) {
            out.push(Accessor {
                name: field.name,
                path: path.to_vec(),
                read: field.read,
            });
        }
    }

    if let Some(base) = definition.base {
        let mut next = path.to_vec();
        next.push(base.project);
        flatten((base.definition)(), &next, seen, out);
    }
}

/// Returns the `TypeId` of the runtime type behind an entity reference.
pub(crate) fn entity_type_id(entity: &dyn Entity) -> TypeId {
    entity.as_any().type_id()
}
