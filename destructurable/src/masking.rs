//! Masking processors for sensitive string values.
//!
//! A [`MaskingProcessor`] is a pure string transformation that may decline to
//! mask its input. The engine keeps the original string when a processor
//! declines, so a processor only has to decide what "maskable" means.
//!
//! [`DefaultMaskingProcessor`] replaces the whole value with a fixed-character
//! pattern configured by [`MaskingOptions`].
//!
//! # Example
//!
//! ```rust
//! use destructurable::{DefaultMaskingProcessor, MaskingOptions, MaskingProcessor};
//!
//! let processor = DefaultMaskingProcessor::new(MaskingOptions::new().with_mask_length(6));
//! assert_eq!(processor.try_mask("123456789").as_deref(), Some("******"));
//!
//! let processor = DefaultMaskingProcessor::new(
//!     MaskingOptions::new().preserve_length().with_mask_char('#'),
//! );
//! assert_eq!(processor.try_mask("AB12").as_deref(), Some("####"));
//! assert_eq!(processor.try_mask("   "), None);
//! ```

/// Default character used to mask sensitive values.
pub const MASK_CHAR: char = '*';

/// Default number of mask characters emitted when the input length is not preserved.
pub const DEFAULT_MASK_LENGTH: usize = 10;

/// Masks a string value, or declines to.
///
/// Returning `None` means the processor declined and the caller keeps the
/// original value. Closures with the matching signature are processors too:
///
/// ```rust
/// use destructurable::MaskingProcessor;
///
/// let last_four = |value: &str| {
///     let count = value.chars().count();
///     (count > 4).then(|| {
///         let visible: String = value.chars().skip(count - 4).collect();
///         format!("{}{visible}", "*".repeat(count - 4))
///     })
/// };
/// assert_eq!(last_four.try_mask("4111111111111111").as_deref(), Some("************1111"));
/// assert_eq!(last_four.try_mask("1111"), None);
/// ```
pub trait MaskingProcessor: Send + Sync {
    /// Returns the masked form of `value`, or `None` to decline.
    fn try_mask(&self, value: &str) -> Option<String>;
}

impl<F> MaskingProcessor for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn try_mask(&self, value: &str) -> Option<String> {
        self(value)
    }
}

/// Configuration for [`DefaultMaskingProcessor`].
///
/// `mask_length` is ignored when `preserve_length` is set; the mask character
/// applies in both modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaskingOptions {
    /// Emit one mask character per input character.
    preserve_length: bool,
    /// Symbol used to build the mask.
    mask_char: char,
    /// Number of mask characters when the input length is not preserved.
    mask_length: usize,
}

impl MaskingOptions {
    /// Constructs the default options: ten `*` characters regardless of input length.
    #[must_use]
    pub fn new() -> Self {
        Self {
            preserve_length: false,
            mask_char: MASK_CHAR,
            mask_length: DEFAULT_MASK_LENGTH,
        }
    }

    /// Emits as many mask characters as the input has characters.
    #[must_use]
    pub fn preserve_length(mut self) -> Self {
        self.preserve_length = true;
        self
    }

    /// Uses a specific masking character.
    #[must_use]
    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        self.mask_char = mask_char;
        self
    }

    /// Uses a fixed mask length (when the input length is not preserved).
    #[must_use]
    pub fn with_mask_length(mut self, mask_length: usize) -> Self {
        self.mask_length = mask_length;
        self
    }

    /// Returns whether the input length is preserved.
    pub fn preserves_length(&self) -> bool {
        self.preserve_length
    }

    /// Returns the masking character.
    pub fn mask_char(&self) -> char {
        self.mask_char
    }

    /// Returns the fixed mask length.
    pub fn mask_length(&self) -> usize {
        self.mask_length
    }
}

impl Default for MaskingOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// The built-in masking processor.
///
/// Declines empty and all-whitespace input. Otherwise the output is made only
/// of the mask character: as long as the input when the length is preserved,
/// `mask_length` characters long otherwise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefaultMaskingProcessor {
    options: MaskingOptions,
}

impl DefaultMaskingProcessor {
    /// Creates a processor from explicit options.
    #[must_use]
    pub fn new(options: MaskingOptions) -> Self {
        Self { options }
    }

    /// Returns the options this processor was built with.
    pub fn options(&self) -> MaskingOptions {
        self.options
    }
}

impl MaskingProcessor for DefaultMaskingProcessor {
    fn try_mask(&self, value: &str) -> Option<String> {
        if value.trim().is_empty() {
            return None;
        }

        let length = if self.options.preserve_length {
            value.chars().count()
        } else {
            self.options.mask_length
        };
        Some(std::iter::repeat_n(self.options.mask_char, length).collect())
    }
}
