//! Mask engine: pure functions from raw input to formatted text and caret.
//!
//! A [`Mask`] is either a set of slot patterns (documents, phones, plates)
//! or a right-aligned [`CurrencyFormat`]. Formatting never fails: foreign
//! characters are dropped and overflow past the capacity is cut off.

mod currency;
mod format;
mod model;
mod parser;
pub mod presets;

pub use currency::CurrencyFormat;
pub use model::{FillMode, MaskToken, Pattern, PatternSet, SlotKind};
pub use parser::MaskParseError;

use crate::text_edit;

/// Result of formatting: the display text plus how many significant
/// characters it carries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Formatted {
    pub text: String,
    pub significant_count: usize,
    complete: bool,
    /// Char offset of every slot that shows a significant character (and,
    /// in fill mode, every placeholder slot too).
    slot_starts: Vec<usize>,
}

impl Formatted {
    pub fn is_empty(&self) -> bool {
        self.significant_count == 0
    }

    /// All slots of the chosen pattern are filled. Currency is complete as
    /// soon as it holds a value.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Leftmost caret position: the first slot, or 0 when nothing shows.
    pub fn caret_floor(&self) -> usize {
        self.slot_starts.first().copied().unwrap_or(0)
    }
}

impl PatternSet {
    pub fn parse<S: AsRef<str>>(sources: &[S]) -> Result<Self, MaskParseError> {
        parser::parse_pattern_set(sources)
    }

    pub fn uppercased(mut self) -> Self {
        self.uppercase = true;
        self
    }

    /// Switches to fill-to-width rendering. The placeholder must not be a
    /// character the set would read back as input.
    pub fn with_placeholder(mut self, placeholder: char) -> Result<Self, MaskParseError> {
        parser::check_placeholder(&self, placeholder)?;
        self.fill = FillMode::Fill { placeholder };
        Ok(self)
    }

    pub fn format(&self, raw: &str) -> Formatted {
        let significant = format::extract_significant(self, raw);
        let (pattern, fitted) = format::select_pattern(self, significant.as_slice());
        format::render(pattern, self.fill, fitted.as_slice())
    }

    pub fn unmask(&self, formatted: &str) -> String {
        format::extract_significant(self, formatted)
            .into_iter()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mask {
    Pattern(PatternSet),
    Currency(CurrencyFormat),
}

impl Mask {
    pub fn pattern(source: &str) -> Result<Self, MaskParseError> {
        Ok(Self::Pattern(PatternSet::parse(&[source])?))
    }

    pub fn patterns<S: AsRef<str>>(sources: &[S]) -> Result<Self, MaskParseError> {
        Ok(Self::Pattern(PatternSet::parse(sources)?))
    }

    pub fn currency(format: CurrencyFormat) -> Self {
        Self::Currency(format)
    }

    pub fn is_currency(&self) -> bool {
        matches!(self, Self::Currency(_))
    }

    /// Maximum number of significant characters the mask holds.
    pub fn capacity(&self) -> usize {
        match self {
            Self::Pattern(set) => set.capacity(),
            Self::Currency(currency) => currency.capacity(),
        }
    }

    pub fn format(&self, raw: &str) -> Formatted {
        match self {
            Self::Pattern(set) => set.format(raw),
            Self::Currency(currency) => currency.format(raw),
        }
    }

    /// Strips the decoration, leaving the canonical value.
    pub fn unmask(&self, formatted: &str) -> String {
        match self {
            Self::Pattern(set) => set.unmask(formatted),
            Self::Currency(currency) => currency.unmask(formatted),
        }
    }

    pub fn is_significant(&self, ch: char) -> bool {
        match self {
            Self::Pattern(set) => set.accepts_char(ch),
            Self::Currency(_) => ch.is_ascii_digit(),
        }
    }

    /// Counts the significant characters in `text`, the way `format` would
    /// before truncation.
    pub fn count_significant(&self, text: &str) -> usize {
        match self {
            Self::Pattern(set) => text.chars().filter(|ch| set.accepts_char(*ch)).count(),
            Self::Currency(_) => text
                .chars()
                .filter(char::is_ascii_digit)
                .skip_while(|ch| *ch == '0')
                .count(),
        }
    }

    /// Places the caret in `formatted` after an edit left it at `caret` in
    /// `edited`. Pattern masks keep the caret after the same number of
    /// significant characters; currency keeps the same number to its right.
    /// When `grew` is set the caret also hops over literals that directly
    /// follow it.
    pub fn reposition_cursor(
        &self,
        edited: &str,
        caret: usize,
        formatted: &Formatted,
        grew: bool,
    ) -> usize {
        let caret = text_edit::clamp_cursor(caret, edited);
        let (before, after) = text_edit::split_at_char(edited, caret);
        match self {
            Self::Pattern(set) => {
                let leading = before.chars().filter(|ch| set.accepts_char(*ch)).count();
                format::leading_caret(formatted, leading, grew)
            }
            Self::Currency(_) => {
                let trailing = after.chars().filter(char::is_ascii_digit).count();
                format::trailing_caret(formatted, trailing)
            }
        }
    }
}

/// Formats `raw` with `mask`. Free-function form of [`Mask::format`].
pub fn format(raw: &str, mask: &Mask) -> Formatted {
    mask.format(raw)
}

/// Mask-agnostic unmasking: keeps ASCII letters and digits only.
pub fn unmask(formatted: &str) -> String {
    formatted
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}
