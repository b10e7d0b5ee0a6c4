//! Adapters for emitting destructured values through `tracing`.
//!
//! This module provides two approaches:
//!
//! - **`TracingDestructureExt::tracing_destructured`**: logs the tree as a
//!   display string. Works with any tracing subscriber but loses structure.
//!
//! - **`TracingDestructureExt::tracing_destructured_valuable`** (requires the
//!   `tracing-valuable` feature): logs the tree as structured data via the
//!   `valuable` crate, so subscribers can traverse it.
//!
//! # Example
//!
//! ```ignore
//! use destructurable::tracing::TracingDestructureExt;
//!
//! tracing::info!(request = %request.tracing_destructured(&policy));
//! tracing::info!(request = request.tracing_destructured_valuable(&policy));
//! ```

use tracing::field::{DisplayValue, display};

#[cfg(feature = "tracing-valuable")]
use crate::tree::StructuredValue;
use crate::{policy::DestructuringPolicy, value::Destructure};

/// Extension trait for logging values through `tracing` under a policy.
pub trait TracingDestructureExt: Destructure + Sized {
    /// Destructures `self` and wraps its text form as a display value.
    fn tracing_destructured(&self, policy: &DestructuringPolicy) -> DisplayValue<String> {
        display(policy.destructure(self).to_string())
    }

    /// Destructures `self` and wraps the tree for structured `valuable` output.
    #[cfg(feature = "tracing-valuable")]
    fn tracing_destructured_valuable(&self, policy: &DestructuringPolicy) -> DestructuredValuable {
        DestructuredValuable::new(policy.destructure(self))
    }
}

impl<T: Destructure> TracingDestructureExt for T {}

/// A destructured tree that implements `valuable::Valuable`.
#[cfg(feature = "tracing-valuable")]
#[derive(Clone, Debug)]
pub struct DestructuredValuable {
    tree: StructuredValue,
}

#[cfg(feature = "tracing-valuable")]
impl DestructuredValuable {
    /// Wraps a tree.
    pub fn new(tree: StructuredValue) -> Self {
        Self { tree }
    }

    /// Returns the wrapped tree.
    pub fn inner(&self) -> &StructuredValue {
        &self.tree
    }
}

#[cfg(feature = "tracing-valuable")]
impl valuable::Valuable for DestructuredValuable {
    fn as_value(&self) -> valuable::Value<'_> {
        valuable::Valuable::as_value(&self.tree)
    }

    fn visit(&self, visit: &mut dyn valuable::Visit) {
        valuable::Valuable::visit(&self.tree, visit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracing_destructured_renders_display_text() {
        let policy = DestructuringPolicy::default();
        let display_value = vec![1_i32, 2].tracing_destructured(&policy);
        assert_eq!(format!("{display_value:?}"), "[1, 2]");
    }

    #[test]
    fn tracing_destructured_handles_null() {
        let policy = DestructuringPolicy::default();
        let none: Option<String> = None;
        assert_eq!(format!("{:?}", none.tracing_destructured(&policy)), "null");
    }

    #[cfg(feature = "tracing-valuable")]
    #[test]
    fn valuable_wrapper_exposes_structure() {
        let policy = DestructuringPolicy::default();
        let wrapper = vec![String::from("a")].tracing_destructured_valuable(&policy);
        assert!(matches!(
            valuable::Valuable::as_value(&wrapper),
            valuable::Value::Listable(_)
        ));
        assert_eq!(wrapper.inner().as_sequence().map(<[_]>::len), Some(1));
    }
}
