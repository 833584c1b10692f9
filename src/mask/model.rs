#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Digit,
    Letter,
    Alnum,
}

impl SlotKind {
    pub fn accepts(self, ch: char) -> bool {
        match self {
            Self::Digit => ch.is_ascii_digit(),
            Self::Letter => ch.is_ascii_alphabetic(),
            Self::Alnum => ch.is_ascii_alphanumeric(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskToken {
    Literal(char),
    Slot(SlotKind),
}

/// How a pattern set renders slots the user has not reached yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    /// Show only as much decoration as the typed characters justify.
    #[default]
    Progressive,
    /// Pad to the full width, drawing empty slots with `placeholder`.
    Fill { placeholder: char },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    tokens: Vec<MaskToken>,
}

impl Pattern {
    pub(super) fn from_tokens(source: impl Into<String>, tokens: Vec<MaskToken>) -> Self {
        Self {
            source: source.into(),
            tokens,
        }
    }

    pub fn source(&self) -> &str {
        self.source.as_str()
    }

    pub fn tokens(&self) -> &[MaskToken] {
        self.tokens.as_slice()
    }

    /// Number of significant characters the pattern holds.
    pub fn capacity(&self) -> usize {
        self.slots().count()
    }

    pub fn slots(&self) -> impl Iterator<Item = SlotKind> + '_ {
        self.tokens.iter().filter_map(|token| match token {
            MaskToken::Slot(kind) => Some(*kind),
            MaskToken::Literal(_) => None,
        })
    }

    pub(super) fn is_numeric(&self) -> bool {
        self.slots().all(|kind| kind == SlotKind::Digit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSet {
    pub(super) patterns: Vec<Pattern>,
    pub(super) fill: FillMode,
    pub(super) uppercase: bool,
}

impl PatternSet {
    pub fn patterns(&self) -> &[Pattern] {
        self.patterns.as_slice()
    }

    /// Capacity of the widest candidate.
    pub fn capacity(&self) -> usize {
        self.patterns
            .iter()
            .map(Pattern::capacity)
            .max()
            .unwrap_or(0)
    }

    /// True when every candidate is digits-only. Numeric sets strip
    /// everything except ASCII digits.
    pub fn is_numeric(&self) -> bool {
        self.patterns.iter().all(Pattern::is_numeric)
    }

    pub(super) fn accepts_char(&self, ch: char) -> bool {
        if self.is_numeric() {
            ch.is_ascii_digit()
        } else {
            ch.is_ascii_alphanumeric()
        }
    }
}
