//! Field rules and their application to a single field value.

use std::{fmt, sync::Arc};

use crate::{
    masking::MaskingProcessor,
    policy::DestructuringPolicy,
    tree::{Scalar, StructuredValue},
    value::{Destructure, Value},
};

/// Text emitted for a field that was selected without choosing a rule.
pub(crate) const UNSELECTED_RULE_TEXT: &str = "Field destructuring rule has not been selected.";

/// How a configured field is rendered.
#[derive(Clone)]
pub enum FieldRule {
    /// Omit the field.
    Ignore,
    /// Emit the realized value under the alias.
    Rename,
    /// Freeze the value as a scalar.
    Snapshot(Snapshot),
    /// Mask string content with a processor.
    Mask(Arc<dyn MaskingProcessor>),
    /// The field was selected but no rule was chosen.
    Unselected,
    /// A caller-supplied rule.
    Custom(Arc<dyn FieldDestructor>),
}

impl FieldRule {
    /// Applies the rule to a field value.
    ///
    /// `None` means the rule produced nothing; for every rule except
    /// [`FieldRule::Ignore`] the engine then falls back to the realized value.
    pub fn apply(
        &self,
        value: &dyn Destructure,
        policy: &DestructuringPolicy,
    ) -> Option<StructuredValue> {
        match self {
            Self::Ignore => None,
            Self::Rename => Some(policy.realize(value)),
            Self::Snapshot(snapshot) => Some(StructuredValue::Scalar(snapshot.capture(value))),
            Self::Mask(processor) => Some(mask(processor.as_ref(), value, policy)),
            Self::Unselected => Some(StructuredValue::Scalar(Scalar::Str(
                UNSELECTED_RULE_TEXT.to_string(),
            ))),
            Self::Custom(destructor) => destructor.destructure(value, policy),
        }
    }

    /// Returns `true` for [`FieldRule::Ignore`].
    pub fn is_ignore(&self) -> bool {
        matches!(self, Self::Ignore)
    }
}

impl fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ignore => f.write_str("Ignore"),
            Self::Rename => f.write_str("Rename"),
            Self::Snapshot(snapshot) => f.debug_tuple("Snapshot").field(snapshot).finish(),
            Self::Mask(_) => f.write_str("Mask"),
            Self::Unselected => f.write_str("Unselected"),
            Self::Custom(_) => f.write_str("Custom"),
        }
    }
}

fn mask(
    processor: &dyn MaskingProcessor,
    value: &dyn Destructure,
    policy: &DestructuringPolicy,
) -> StructuredValue {
    match value.value() {
        Value::Scalar(Scalar::Str(text)) => {
            let masked = processor.try_mask(&text).unwrap_or(text);
            StructuredValue::Scalar(Scalar::Str(masked))
        }
        Value::Scalar(Scalar::Null) => StructuredValue::NULL,
        Value::Sequence(items) if items.iter().all(|item| is_text_or_null(*item)) => {
            StructuredValue::Sequence(
                items
                    .into_iter()
                    .map(|item| mask(processor, item, policy))
                    .collect(),
            )
        }
        _ => policy.realize(value),
    }
}

fn is_text_or_null(value: &dyn Destructure) -> bool {
    matches!(
        value.value(),
        Value::Scalar(Scalar::Str(_) | Scalar::Null)
    )
}

/// Freezes a value into a scalar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Capture the display string instead of the value.
    pub mutable: bool,
}

impl Snapshot {
    /// Creates a snapshot rule.
    pub fn new(mutable: bool) -> Self {
        Self { mutable }
    }

    /// Freezes `value`.
    ///
    /// Null values stay null. A mutable snapshot captures the display string
    /// at this moment, so later changes to the source do not leak into the
    /// record.
    pub fn capture(&self, value: &dyn Destructure) -> Scalar {
        if value.is_null() {
            Scalar::Null
        } else if self.mutable {
            Scalar::Str(value.display_string())
        } else {
            value.capture()
        }
    }
}

/// A caller-supplied field rule.
///
/// Returning `None` makes the engine emit the realized value under the
/// field's alias.
///
/// ```rust
/// use destructurable::{DestructuringPolicy, Destructure, FieldDestructor, Scalar, StructuredValue};
///
/// struct Length;
///
/// impl FieldDestructor for Length {
///     fn destructure(
///         &self,
///         value: &dyn Destructure,
///         _policy: &DestructuringPolicy,
///     ) -> Option<StructuredValue> {
///         let text = value.display_string();
///         Some(Scalar::U64(text.chars().count() as u64).into())
///     }
/// }
/// ```
pub trait FieldDestructor: Send + Sync {
    /// Renders the field value, or returns `None` to fall back.
    fn destructure(
        &self,
        value: &dyn Destructure,
        policy: &DestructuringPolicy,
    ) -> Option<StructuredValue>;
}

impl<F> FieldDestructor for F
where
    F: Fn(&dyn Destructure, &DestructuringPolicy) -> Option<StructuredValue> + Send + Sync,
{
    fn destructure(
        &self,
        value: &dyn Destructure,
        policy: &DestructuringPolicy,
    ) -> Option<StructuredValue> {
        self(value, policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::masking::{DefaultMaskingProcessor, MaskingOptions};

    fn policy() -> DestructuringPolicy {
        DestructuringPolicy::builder().build().unwrap()
    }

    fn masked(value: &dyn Destructure) -> StructuredValue {
        let rule = FieldRule::Mask(Arc::new(DefaultMaskingProcessor::new(
            MaskingOptions::new().preserve_length(),
        )));
        rule.apply(value, &policy()).unwrap()
    }

    #[test]
    fn mask_replaces_strings() {
        assert_eq!(masked(&String::from("secret")).as_str(), Some("******"));
    }

    #[test]
    fn mask_keeps_original_when_processor_declines() {
        assert_eq!(masked(&String::from("  ")).as_str(), Some("  "));
    }

    #[test]
    fn mask_keeps_null() {
        let none: Option<String> = None;
        assert!(masked(&none).is_null());
    }

    #[test]
    fn mask_applies_to_each_string_element() {
        let values = vec![Some(String::from("ab")), None, Some(String::from("xyz"))];
        let result = masked(&values);
        let items = result.as_sequence().unwrap();
        assert_eq!(items[0].as_str(), Some("**"));
        assert!(items[1].is_null());
        assert_eq!(items[2].as_str(), Some("***"));
    }

    #[test]
    fn mask_leaves_other_types_realized() {
        assert_eq!(masked(&42_i32), StructuredValue::Scalar(Scalar::I64(42)));
        let numbers = vec![1_i32, 2];
        assert_eq!(
            masked(&numbers),
            StructuredValue::Sequence(vec![Scalar::I64(1).into(), Scalar::I64(2).into()])
        );
    }

    #[test]
    fn snapshot_modes() {
        let value = vec![1_i32, 2];
        assert_eq!(Snapshot::new(true).capture(&value), Scalar::Str("[1, 2]".into()));
        let Scalar::Opaque(opaque) = Snapshot::new(false).capture(&value) else {
            panic!("expected opaque scalar");
        };
        assert_eq!(opaque.downcast_ref::<Vec<i32>>(), Some(&value));
        assert_eq!(Snapshot::new(true).capture(&()), Scalar::Null);
    }

    #[test]
    fn unselected_emits_placeholder() {
        let result = FieldRule::Unselected.apply(&1_i32, &policy()).unwrap();
        assert_eq!(result.as_str(), Some(UNSELECTED_RULE_TEXT));
    }

    #[test]
    fn ignore_yields_nothing() {
        assert!(FieldRule::Ignore.apply(&1_i32, &policy()).is_none());
        assert!(FieldRule::Ignore.is_ignore());
    }

    #[test]
    fn custom_closure_rule() {
        let rule = FieldRule::Custom(Arc::new(
            |value: &dyn Destructure, _: &DestructuringPolicy| {
                Some(StructuredValue::Scalar(Scalar::Str(value.display_string().to_uppercase())))
            },
        ));
        assert_eq!(
            rule.apply(&String::from("abc"), &policy()).unwrap().as_str(),
            Some("ABC")
        );
    }
}
