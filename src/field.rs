use crate::mask::{Formatted, Mask};
use crate::text_edit;
use log::{debug, trace};

/// What the binding shim writes back into the widget after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUpdate {
    pub text: String,
    pub cursor: usize,
}

/// One masked text field: its current display text and caret.
///
/// The shim either forwards whole edits (`on_input` / `on_paste`, carrying
/// the widget text after the browser-style edit and the caret inside it) or
/// single keystrokes (`insert_char`, `delete_prev`, ...). Every path ends in
/// one synchronous pass of the mask engine.
#[derive(Debug, Clone)]
pub struct MaskedField {
    id: String,
    mask: Mask,
    formatted: Formatted,
    cursor: usize,
}

impl MaskedField {
    pub fn new(id: impl Into<String>, mask: Mask) -> Self {
        let formatted = mask.format("");
        let cursor = formatted.caret_floor();
        Self {
            id: id.into(),
            mask,
            formatted,
            cursor,
        }
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn text(&self) -> &str {
        self.formatted.text.as_str()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn formatted(&self) -> &Formatted {
        &self.formatted
    }

    pub fn is_complete(&self) -> bool {
        self.formatted.is_complete()
    }

    /// Canonical value without decoration, e.g. the bare CNPJ digits.
    pub fn unmasked_value(&self) -> String {
        self.mask.unmask(self.text())
    }

    /// Numeric value of the field, `0.0` when it cannot be parsed.
    pub fn currency_value(&self) -> f64 {
        match &self.mask {
            Mask::Currency(currency) => currency.value_of(self.text()),
            Mask::Pattern(_) => self
                .text()
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .unwrap_or(0.0),
        }
    }

    /// Replaces the content, e.g. with a server-rendered initial value.
    /// Currency fields read the value as a decimal amount.
    pub fn set_value(&mut self, value: &str) {
        self.formatted = match &self.mask {
            Mask::Currency(currency) => match currency.parse_amount(value) {
                Some(amount) => currency.render_amount(amount),
                None => currency.format(value),
            },
            Mask::Pattern(set) => set.format(value),
        };
        self.cursor = self.end_caret();
    }

    pub fn clear(&mut self) {
        self.formatted = self.mask.format("");
        self.cursor = self.formatted.caret_floor();
    }

    /// Handles a text change. `edited` is the widget content after the edit,
    /// `caret` the caret inside it.
    pub fn on_input(&mut self, edited: &str, caret: usize) -> FieldUpdate {
        let previous_count = self.formatted.significant_count;
        let edited_count = self.mask.count_significant(edited);

        if previous_count >= self.mask.capacity() && edited_count > previous_count {
            let inserted = text_edit::char_count(edited)
                .saturating_sub(text_edit::char_count(self.text()));
            self.cursor = text_edit::clamp_cursor(caret.saturating_sub(inserted), self.text());
            debug!("field `{}` is full, dropped {inserted} char(s)", self.id);
            return self.update();
        }

        let capacity = self.mask.capacity();
        let (edited, caret) = if edited_count > capacity {
            self.trim_insertion(edited, caret, edited_count - capacity)
        } else {
            (edited.to_string(), caret)
        };
        let edited = edited.as_str();

        let formatted = self.mask.format(edited);
        let grew = formatted.significant_count > previous_count;
        self.cursor = self.mask.reposition_cursor(edited, caret, &formatted, grew);
        trace!(
            "field `{}`: {edited:?} @{caret} -> {:?} @{}",
            self.id, formatted.text, self.cursor
        );
        self.formatted = formatted;
        self.update()
    }

    pub fn on_paste(&mut self, edited: &str, caret: usize) -> FieldUpdate {
        trace!("field `{}`: paste", self.id);
        self.on_input(edited, caret)
    }

    pub fn insert_char(&mut self, ch: char) -> bool {
        if !self.mask.is_significant(ch) {
            return false;
        }
        let mut edited = self.text().to_string();
        let mut caret = self.cursor;
        text_edit::insert_char(&mut edited, &mut caret, ch);
        self.apply(edited.as_str(), caret)
    }

    pub fn paste(&mut self, text: &str) -> bool {
        let mut edited = self.text().to_string();
        let mut caret = self.cursor;
        text_edit::insert_str(&mut edited, &mut caret, text);
        let before = self.update();
        self.on_paste(edited.as_str(), caret) != before
    }

    /// Backspace. Decoration left of the caret is stepped over so the key
    /// always removes a significant character.
    pub fn delete_prev(&mut self) -> bool {
        let mut edited = self.text().to_string();
        let mut caret = self.cursor;
        while caret > 0 && !self.is_significant_at(caret - 1) {
            caret -= 1;
        }
        if !text_edit::backspace_char(&mut edited, &mut caret) {
            return false;
        }
        self.apply(edited.as_str(), caret)
    }

    pub fn delete_next(&mut self) -> bool {
        let mut edited = self.text().to_string();
        let mut caret = self.cursor;
        let len = text_edit::char_count(edited.as_str());
        while caret < len && !self.is_significant_at(caret) {
            caret += 1;
        }
        if !text_edit::delete_char(&mut edited, &mut caret) {
            return false;
        }
        self.apply(edited.as_str(), caret)
    }

    pub fn move_left(&mut self) -> bool {
        let floor = self.formatted.caret_floor();
        if self.cursor <= floor {
            return false;
        }
        text_edit::move_left(&mut self.cursor, self.formatted.text.as_str())
    }

    pub fn move_right(&mut self) -> bool {
        text_edit::move_right(&mut self.cursor, self.formatted.text.as_str())
    }

    pub fn move_home(&mut self) -> bool {
        let floor = self.formatted.caret_floor();
        let moved = self.cursor != floor;
        self.cursor = floor;
        moved
    }

    pub fn move_end(&mut self) -> bool {
        let end = self.end_caret();
        let moved = self.cursor != end;
        self.cursor = end;
        moved
    }

    fn apply(&mut self, edited: &str, caret: usize) -> bool {
        let before = self.update();
        self.on_input(edited, caret) != before
    }

    /// Drops the last `excess` significant characters of the text inserted
    /// right before `caret`, so an overflowing paste never pushes out what
    /// the field already held.
    fn trim_insertion(&self, edited: &str, caret: usize, excess: usize) -> (String, usize) {
        let chars: Vec<char> = edited.chars().collect();
        let caret = caret.min(chars.len());
        let inserted = chars.len().saturating_sub(text_edit::char_count(self.text()));
        let start = caret.saturating_sub(inserted);

        let mut keep = vec![true; chars.len()];
        let mut remaining = excess;
        for pos in (start..caret).rev() {
            if remaining == 0 {
                break;
            }
            if self.mask.is_significant(chars[pos]) {
                keep[pos] = false;
                remaining -= 1;
            }
        }

        let removed = keep.iter().filter(|kept| !**kept).count();
        if removed > 0 {
            debug!("field `{}` overflowed, dropped {removed} pasted char(s)", self.id);
        }
        let trimmed = chars
            .iter()
            .zip(&keep)
            .filter(|(_, kept)| **kept)
            .map(|(ch, _)| *ch)
            .collect();
        (trimmed, caret - removed)
    }

    fn is_significant_at(&self, pos: usize) -> bool {
        self.text()
            .chars()
            .nth(pos)
            .is_some_and(|ch| self.mask.is_significant(ch))
    }

    fn end_caret(&self) -> usize {
        let text = self.text();
        self.mask
            .reposition_cursor(text, text_edit::char_count(text), &self.formatted, true)
    }

    fn update(&self) -> FieldUpdate {
        FieldUpdate {
            text: self.formatted.text.clone(),
            cursor: self.cursor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MaskedField;
    use crate::mask::{Mask, PatternSet, presets};

    fn type_text(field: &mut MaskedField, text: &str) {
        for ch in text.chars() {
            field.insert_char(ch);
        }
    }

    #[test]
    fn typing_cnpj_progressively() {
        let mut field = MaskedField::new("id_cnpj", presets::cnpj());
        type_text(&mut field, "12");
        assert_eq!(field.text(), "12");
        assert_eq!(field.cursor(), 2);

        field.insert_char('3');
        assert_eq!(field.text(), "12.3");
        assert_eq!(field.cursor(), 4);

        type_text(&mut field, "45678000195");
        assert_eq!(field.text(), "12.345.678/0001-95");
        assert_eq!(field.cursor(), 18);
        assert!(field.is_complete());
        assert_eq!(field.unmasked_value(), "12345678000195");
    }

    #[test]
    fn full_field_rejects_more_input() {
        let mut field = MaskedField::new("id_cep", presets::cep()).with_value("01310-100");
        assert!(!field.insert_char('9'));
        assert_eq!(field.text(), "01310-100");

        field.move_home();
        field.move_right();
        let update = field.on_input("091310-100", 2);
        assert_eq!(update.text, "01310-100");
        assert_eq!(update.cursor, 1);
    }

    #[test]
    fn letters_are_ignored_by_numeric_fields() {
        let mut field = MaskedField::new("id_ano", presets::year());
        assert!(!field.insert_char('x'));
        assert_eq!(field.text(), "");
    }

    #[test]
    fn backspace_steps_over_literals() {
        let mut field = MaskedField::new("id_cnpj", presets::cnpj()).with_value("12345");
        assert_eq!(field.text(), "12.345");

        field.move_home();
        field.move_right();
        field.move_right();
        field.move_right();
        assert_eq!(field.cursor(), 3);

        assert!(field.delete_prev());
        assert_eq!(field.text(), "13.45");
        assert_eq!(field.cursor(), 1);
    }

    #[test]
    fn delete_next_steps_over_literals() {
        let mut field = MaskedField::new("id_cnpj", presets::cnpj()).with_value("12345");
        field.move_home();
        field.move_right();
        field.move_right();
        assert!(field.delete_next());
        assert_eq!(field.text(), "12.45");
        assert_eq!(field.cursor(), 2);
    }

    #[test]
    fn paste_in_the_middle_reformats_everything() {
        let mut field = MaskedField::new("id_cpf", presets::cpf());
        type_text(&mut field, "12");
        assert!(field.paste("345.678-90"));
        assert_eq!(field.text(), "123.456.789-0");
        assert_eq!(field.cursor(), 13);
    }

    #[test]
    fn overflowing_paste_keeps_what_was_already_typed() {
        let mut field = MaskedField::new("id_cpf", presets::cpf()).with_value("1234567890");
        assert_eq!(field.text(), "123.456.789-0");
        field.move_home();
        assert!(field.paste("99"));
        assert_eq!(field.text(), "912.345.678-90");
        assert_eq!(field.cursor(), 1);
        assert_eq!(field.unmasked_value(), "91234567890");
    }

    #[test]
    fn overflowing_paste_from_empty_keeps_the_first_characters() {
        let mut field = MaskedField::new("id_cep", presets::cep());
        let update = field.on_paste("0131010099", 10);
        assert_eq!(update.text, "01310-100");
        assert_eq!(update.cursor, 9);
    }

    #[test]
    fn on_paste_full_value_puts_caret_at_end() {
        let mut field = MaskedField::new("id_cnpj", presets::cnpj());
        let update = field.on_paste("12345678000195", 14);
        assert_eq!(update.text, "12.345.678/0001-95");
        assert_eq!(update.cursor, 18);
    }

    #[test]
    fn phone_switches_to_mobile_layout() {
        let mut field = MaskedField::new("id_telefone", presets::phone());
        type_text(&mut field, "1133334444");
        assert_eq!(field.text(), "(11) 3333-4444");
        field.insert_char('5');
        assert_eq!(field.text(), "(11) 33334-4445");
        assert_eq!(field.cursor(), 15);
    }

    #[test]
    fn move_left_stops_at_first_slot() {
        let mut field = MaskedField::new("id_telefone", presets::phone()).with_value("11");
        assert_eq!(field.text(), "(11");
        assert!(field.move_left());
        assert!(field.move_left());
        assert!(!field.move_left());
        assert_eq!(field.cursor(), 1);
    }

    #[test]
    fn currency_field_restores_initial_amount() {
        let field = MaskedField::new("valor", presets::currency()).with_value("1234.5");
        assert_eq!(field.text(), "R$ 1.234,50");
        assert_eq!(field.currency_value(), 1234.5);
        assert_eq!(field.unmasked_value(), "123450");
    }

    #[test]
    fn currency_typing_shifts_digits_left() {
        let mut field = MaskedField::new("preco", presets::currency());
        type_text(&mut field, "1999");
        assert_eq!(field.text(), "R$ 19,99");
        assert_eq!(field.cursor(), 8);

        assert!(field.delete_prev());
        assert_eq!(field.text(), "R$ 1,99");
    }

    #[test]
    fn currency_value_of_unparseable_text_is_zero() {
        let field = MaskedField::new("valor", presets::currency());
        assert_eq!(field.currency_value(), 0.0);

        let year = MaskedField::new("ano", presets::year()).with_value("2024");
        assert_eq!(year.currency_value(), 2024.0);
    }

    #[test]
    fn fill_mode_caret_jumps_to_next_slot() {
        let set = PatternSet::parse(&["#####-###"])
            .expect("set")
            .with_placeholder('_')
            .expect("placeholder");
        let mut field = MaskedField::new("id_cep", Mask::Pattern(set));
        assert_eq!(field.text(), "_____-___");
        assert_eq!(field.cursor(), 0);

        type_text(&mut field, "12345");
        assert_eq!(field.text(), "12345-___");
        assert_eq!(field.cursor(), 6);

        assert!(field.delete_prev());
        assert_eq!(field.text(), "1234_-___");
        assert_eq!(field.cursor(), 4);
    }

    #[test]
    fn clear_resets_to_empty_state() {
        let mut field = MaskedField::new("id_placa", presets::plate()).with_value("abc1d23");
        assert_eq!(field.text(), "ABC1D23");
        field.clear();
        assert_eq!(field.text(), "");
        assert_eq!(field.cursor(), 0);
    }
}
