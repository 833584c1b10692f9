//! Char-indexed editing helpers. Carets are char offsets, never bytes.

pub fn char_count(value: &str) -> usize {
    value.chars().count()
}

pub fn clamp_cursor(cursor: usize, value: &str) -> usize {
    cursor.min(char_count(value))
}

pub fn split_at_char(value: &str, cursor: usize) -> (&str, &str) {
    value.split_at(byte_index_at_char(value, cursor))
}

pub fn insert_char(value: &mut String, cursor: &mut usize, ch: char) {
    let pos = clamp_cursor(*cursor, value);
    let byte_pos = byte_index_at_char(value, pos);
    value.insert(byte_pos, ch);
    *cursor = pos + 1;
}

pub fn insert_str(value: &mut String, cursor: &mut usize, text: &str) {
    let pos = clamp_cursor(*cursor, value);
    let byte_pos = byte_index_at_char(value, pos);
    value.insert_str(byte_pos, text);
    *cursor = pos + char_count(text);
}

pub fn backspace_char(value: &mut String, cursor: &mut usize) -> bool {
    let pos = clamp_cursor(*cursor, value);
    if pos == 0 {
        return false;
    }
    let byte_pos = byte_index_at_char(value, pos - 1);
    value.remove(byte_pos);
    *cursor = pos - 1;
    true
}

pub fn delete_char(value: &mut String, cursor: &mut usize) -> bool {
    let pos = clamp_cursor(*cursor, value);
    if pos >= char_count(value) {
        *cursor = pos;
        return false;
    }
    let byte_pos = byte_index_at_char(value, pos);
    value.remove(byte_pos);
    *cursor = pos;
    true
}

pub fn move_left(cursor: &mut usize, value: &str) -> bool {
    let pos = clamp_cursor(*cursor, value);
    if pos == 0 {
        return false;
    }
    *cursor = pos - 1;
    true
}

pub fn move_right(cursor: &mut usize, value: &str) -> bool {
    let pos = clamp_cursor(*cursor, value);
    let len = char_count(value);
    if pos >= len {
        return false;
    }
    *cursor = pos + 1;
    true
}

fn byte_index_at_char(value: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    value
        .char_indices()
        .nth(char_idx)
        .map(|(idx, _)| idx)
        .unwrap_or(value.len())
}

#[cfg(test)]
mod tests {
    use super::{backspace_char, delete_char, insert_str, split_at_char};

    #[test]
    fn split_respects_multibyte_chars() {
        assert_eq!(split_at_char("R$ ção", 4), ("R$ ç", "ão"));
        assert_eq!(split_at_char("abc", 10), ("abc", ""));
    }

    #[test]
    fn insert_str_moves_cursor_past_text() {
        let mut value = String::from("12");
        let mut cursor = 1;
        insert_str(&mut value, &mut cursor, "ab");
        assert_eq!(value, "1ab2");
        assert_eq!(cursor, 3);
    }

    #[test]
    fn backspace_and_delete_at_edges() {
        let mut value = String::from("ab");
        let mut cursor = 0;
        assert!(!backspace_char(&mut value, &mut cursor));
        assert!(delete_char(&mut value, &mut cursor));
        assert_eq!(value, "b");

        cursor = 1;
        assert!(!delete_char(&mut value, &mut cursor));
        assert!(backspace_char(&mut value, &mut cursor));
        assert_eq!(value, "");
    }
}
