use super::model::{FillMode, MaskToken, Pattern, PatternSet, SlotKind};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskParseError {
    message: String,
}

impl MaskParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for MaskParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message.as_str())
    }
}

impl std::error::Error for MaskParseError {}

pub(super) fn check_currency(
    symbol: &str,
    thousands: char,
    radix: char,
    scale: u32,
    max: f64,
) -> Result<(), MaskParseError> {
    if thousands == radix {
        return Err(MaskParseError::new(format!(
            "thousands separator and radix are both `{radix}`"
        )));
    }
    if thousands.is_ascii_digit() || radix.is_ascii_digit() {
        return Err(MaskParseError::new("currency separators cannot be digits"));
    }
    if symbol.chars().any(|ch| ch.is_ascii_digit()) {
        return Err(MaskParseError::new(format!(
            "currency symbol `{symbol}` contains a digit"
        )));
    }
    if scale > 6 {
        return Err(MaskParseError::new(format!("scale {scale} is above 6")));
    }
    if !(max.is_finite() && max > 0.0) {
        return Err(MaskParseError::new("currency maximum must be a positive number"));
    }
    Ok(())
}

/// Parses the compact mask notation: `#` digit, `A` letter, `*` alnum,
/// `{n}` repeats the preceding slot, `\x` is a literal `x`.
pub(super) fn parse_pattern(source: &str) -> Result<Pattern, MaskParseError> {
    let mut tokens = Vec::<MaskToken>::new();
    let chars: Vec<char> = source.chars().collect();
    let mut idx = 0usize;

    while idx < chars.len() {
        let ch = chars[idx];
        let kind = match ch {
            '#' => Some(SlotKind::Digit),
            'A' => Some(SlotKind::Letter),
            '*' => Some(SlotKind::Alnum),
            _ => None,
        };

        if let Some(kind) = kind {
            let (count, next_idx) = parse_repeat(&chars, idx + 1, source)?;
            tokens.extend(std::iter::repeat_n(MaskToken::Slot(kind), count));
            idx = next_idx;
            continue;
        }

        if ch == '\\' {
            let Some(escaped) = chars.get(idx + 1).copied() else {
                return Err(MaskParseError::new(format!(
                    "dangling escape at end of mask `{source}`"
                )));
            };
            tokens.push(MaskToken::Literal(escaped));
            idx += 2;
            continue;
        }

        if ch == '{' || ch == '}' {
            return Err(MaskParseError::new(format!(
                "repeat `{ch}` at column {idx} does not follow a slot in `{source}`"
            )));
        }

        tokens.push(MaskToken::Literal(ch));
        idx += 1;
    }

    if !tokens.iter().any(|token| matches!(token, MaskToken::Slot(_))) {
        return Err(MaskParseError::new(format!("mask `{source}` has no slots")));
    }

    Ok(Pattern::from_tokens(source, tokens))
}

pub(super) fn parse_pattern_set<S: AsRef<str>>(
    sources: &[S],
) -> Result<PatternSet, MaskParseError> {
    if sources.is_empty() {
        return Err(MaskParseError::new("pattern set needs at least one pattern"));
    }

    let patterns = sources
        .iter()
        .map(|source| parse_pattern(source.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    let set = PatternSet {
        patterns,
        fill: FillMode::Progressive,
        uppercase: false,
    };

    let clashing_literal = set
        .patterns
        .iter()
        .flat_map(|pattern| pattern.tokens().iter())
        .find_map(|token| match token {
            MaskToken::Literal(ch) if set.accepts_char(*ch) => Some(*ch),
            _ => None,
        });
    if let Some(ch) = clashing_literal {
        return Err(MaskParseError::new(format!(
            "literal `{ch}` would be read back as input"
        )));
    }

    Ok(set)
}

pub(super) fn check_placeholder(
    set: &PatternSet,
    placeholder: char,
) -> Result<(), MaskParseError> {
    if set.accepts_char(placeholder) {
        return Err(MaskParseError::new(format!(
            "placeholder `{placeholder}` would be read back as input"
        )));
    }
    Ok(())
}

fn parse_repeat(
    chars: &[char],
    mut idx: usize,
    source: &str,
) -> Result<(usize, usize), MaskParseError> {
    if idx >= chars.len() || chars[idx] != '{' {
        return Ok((1, idx));
    }
    idx += 1;
    let start = idx;

    while idx < chars.len() && chars[idx] != '}' {
        idx += 1;
    }
    if idx >= chars.len() {
        return Err(MaskParseError::new(format!(
            "unterminated repeat in mask `{source}`"
        )));
    }

    let inner: String = chars[start..idx].iter().collect();
    let count = inner
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|count| *count > 0)
        .ok_or_else(|| {
            MaskParseError::new(format!("invalid repeat `{{{inner}}}` in mask `{source}`"))
        })?;

    Ok((count, idx + 1))
}
