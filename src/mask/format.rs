use super::Formatted;
use super::model::{FillMode, MaskToken, Pattern, PatternSet};
use crate::text_edit;

/// Keeps the characters the set's alphabet allows, capped at the widest
/// candidate. The first characters win; excess at the end is dropped.
pub(super) fn extract_significant(set: &PatternSet, input: &str) -> Vec<char> {
    input
        .chars()
        .filter(|ch| set.accepts_char(*ch))
        .map(|ch| if set.uppercase { ch.to_ascii_uppercase() } else { ch })
        .take(set.capacity())
        .collect()
}

/// Feeds `raw` through the slots of `pattern`. A character the next slot
/// does not accept is skipped.
fn fit(pattern: &Pattern, raw: &[char]) -> Vec<char> {
    let mut slots = pattern.slots();
    let mut next = slots.next();
    let mut out = Vec::with_capacity(raw.len());
    for ch in raw {
        let Some(kind) = next else {
            break;
        };
        if kind.accepts(*ch) {
            out.push(*ch);
            next = slots.next();
        }
    }
    out
}

/// Picks the candidate that keeps the most characters. Ties go to the
/// tighter capacity, then to the earlier candidate.
pub(super) fn select_pattern<'a>(
    set: &'a PatternSet,
    raw: &[char],
) -> (&'a Pattern, Vec<char>) {
    let mut best: Option<(&Pattern, Vec<char>)> = None;
    for pattern in &set.patterns {
        let fitted = fit(pattern, raw);
        let better = match &best {
            None => true,
            Some((current, kept)) => {
                fitted.len() > kept.len()
                    || (fitted.len() == kept.len() && pattern.capacity() < current.capacity())
            }
        };
        if better {
            best = Some((pattern, fitted));
        }
    }

    match best {
        Some(best) => best,
        None => (&set.patterns[0], Vec::new()),
    }
}

pub(super) fn render(pattern: &Pattern, fill: FillMode, raw: &[char]) -> Formatted {
    match fill {
        FillMode::Progressive => render_progressive(pattern, raw),
        FillMode::Fill { placeholder } => render_filled(pattern, raw, placeholder),
    }
}

fn render_progressive(pattern: &Pattern, raw: &[char]) -> Formatted {
    let mut text = String::new();
    let mut pending = String::new();
    let mut slot_starts = Vec::with_capacity(raw.len());
    let mut chars = raw.iter();
    let mut len = 0usize;

    for token in pattern.tokens() {
        match token {
            MaskToken::Literal(ch) => pending.push(*ch),
            MaskToken::Slot(_) => {
                let Some(ch) = chars.next() else {
                    break;
                };
                len += text_edit::char_count(pending.as_str());
                text.push_str(pending.as_str());
                pending.clear();
                slot_starts.push(len);
                text.push(*ch);
                len += 1;
            }
        }
    }

    Formatted {
        text,
        significant_count: slot_starts.len(),
        complete: slot_starts.len() == pattern.capacity(),
        slot_starts,
    }
}

fn render_filled(pattern: &Pattern, raw: &[char], placeholder: char) -> Formatted {
    let mut text = String::new();
    let mut slot_starts = Vec::with_capacity(pattern.capacity());
    let mut chars = raw.iter();
    let mut used = 0usize;

    for (pos, token) in pattern.tokens().iter().enumerate() {
        match token {
            MaskToken::Literal(ch) => text.push(*ch),
            MaskToken::Slot(_) => {
                slot_starts.push(pos);
                match chars.next() {
                    Some(ch) => {
                        text.push(*ch);
                        used += 1;
                    }
                    None => text.push(placeholder),
                }
            }
        }
    }

    Formatted {
        text,
        significant_count: used,
        complete: used == pattern.capacity(),
        slot_starts,
    }
}

/// Caret position right after the `leading`-th significant character.
/// With `skip_literals` the caret also moves over decoration up to the next
/// slot, which is where the following character will land.
pub(super) fn leading_caret(
    formatted: &Formatted,
    leading: usize,
    skip_literals: bool,
) -> usize {
    let len = text_edit::char_count(formatted.text.as_str());
    let floor = formatted.caret_floor();
    let leading = leading.min(formatted.significant_count);

    let caret = if skip_literals {
        formatted.slot_starts.get(leading).copied().unwrap_or(len)
    } else if leading == 0 {
        floor
    } else {
        formatted.slot_starts[leading - 1] + 1
    };

    caret.clamp(floor.min(len), len)
}

/// Caret position that leaves `trailing` significant characters to its
/// right. Used by right-aligned numeric masks.
pub(super) fn trailing_caret(formatted: &Formatted, trailing: usize) -> usize {
    let len = text_edit::char_count(formatted.text.as_str());
    let floor = formatted.caret_floor();
    let count = formatted.slot_starts.len();

    let caret = if trailing == 0 {
        len
    } else if trailing >= count {
        floor
    } else {
        formatted.slot_starts[count - trailing]
    };

    caret.clamp(floor.min(len), len)
}
