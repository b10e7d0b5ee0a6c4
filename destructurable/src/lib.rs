//! Rule-driven destructuring of domain values into structured log values.
//!
//! This crate separates:
//! - **The value model**: how a value presents itself ([`Destructure`], [`Entity`]).
//! - **Rule sets**: per-type, per-field rules authored once through
//!   [`DestructuringPolicy::builder`] (rename, ignore, mask, snapshot, nested).
//! - **The engine**: [`DestructuringPolicy::destructure`] walks a value under
//!   those rules and returns a [`StructuredValue`] tree.
//!
//! What this crate does:
//! - resolves rule sets by exact runtime type
//! - masks sensitive strings and freezes values as scalar snapshots
//! - provides integrations behind feature flags (`json`, `slog`, `tracing-valuable`)
//!
//! What it does not do:
//! - serialize to bytes or perform I/O
//! - discover rule sets at runtime
//!
//! The `Entity` derive macro lives in `destructurable-derive` and is re-exported
//! from this crate.
//!
//! # Example
//!
//! ```ignore
//! use destructurable::{DestructuringPolicy, Entity, MaskingOptions};
//!
//! #[derive(Clone, Entity)]
//! pub struct EmployeeAddRequest {
//!     pub first_name: String,
//!     pub passport_series: String,
//! }
//!
//! let policy = DestructuringPolicy::builder()
//!     .entity::<EmployeeAddRequest>(|e| {
//!         e.field("passport_series")
//!             .mask_with(MaskingOptions::new().preserve_length().with_mask_char('#'))
//!             .alias("series");
//!     })
//!     .build()?;
//!
//! let tree = policy.destructure(&request);
//! ```

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::default_trait_access,
    clippy::doc_markdown,
    clippy::if_not_else,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::enum_glob_use,
    clippy::struct_excessive_bools,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::option_if_let_else,
    clippy::from_over_into
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

pub use destructurable_derive::Entity;

#[allow(unused_extern_crates)]
extern crate self as destructurable;

// Module declarations
pub mod config;
mod entity;
pub mod masking;
mod policy;
#[cfg(feature = "slog")]
pub mod slog;
pub mod tracing;
mod tree;
mod value;

// Re-exports from config module
pub use config::{
    AliasBuilder, ApplyConfiguration, ConditionBuilder, ConfigError, EntityBuilder, EntityConfig,
    EntityConfiguration, FieldBuilder, FieldConfig, FieldDestructor, FieldRule, NestedRule,
    PolicyBuilder, Predicate, Registry, SimpleRule, Snapshot,
};
// Re-exports from entity module
pub use entity::{Accessor, BaseDef, Entity, EntityDef, EntityLayout, FieldDef, Projection, Reader};
// Re-exports from masking module
pub use masking::{
    DEFAULT_MASK_LENGTH, DefaultMaskingProcessor, MASK_CHAR, MaskingOptions, MaskingProcessor,
};
pub use policy::{DestructuringPolicy, PolicyOptions};
pub use tree::{OpaqueValue, Property, Scalar, Structure, StructuredValue, TYPE_TAG_KEY};
pub use value::{Destructure, FieldRef, Value};
