//! Terminal demo: a handful of masked fields edited in raw mode.

use crate::field::MaskedField;
use crate::registry::{AttachedForm, FieldDescriptor};
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers, Terminal};
use indexmap::IndexMap;
use log::debug;
use std::io;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Editing,
    Submitted,
    Cancelled,
}

/// One rendered row plus the display column of the caret on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub text: String,
    pub focused: bool,
    pub cursor_column: usize,
}

pub struct App {
    form: AttachedForm,
    focus: usize,
    status: Status,
    drawn_rows: u16,
}

impl App {
    pub fn new(form: AttachedForm) -> Self {
        Self {
            form,
            focus: 0,
            status: Status::Editing,
            drawn_rows: 0,
        }
    }

    pub fn form(&self) -> &AttachedForm {
        &self.form
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn should_exit(&self) -> bool {
        self.status != Status::Editing
    }

    /// Values to submit; `None` unless the form was submitted.
    pub fn submission(&self) -> Option<IndexMap<String, String>> {
        (self.status == Status::Submitted).then(|| self.form.unmasked_values())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if control => self.status = Status::Cancelled,
            KeyCode::Esc => self.status = Status::Cancelled,
            KeyCode::Enter => self.status = Status::Submitted,
            KeyCode::Tab | KeyCode::Down => self.move_focus(1),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(-1),
            KeyCode::Char(ch) if !control && !key.modifiers.contains(KeyModifiers::ALT) => {
                self.with_focused(|field| field.insert_char(ch));
            }
            KeyCode::Backspace => self.with_focused(MaskedField::delete_prev),
            KeyCode::Delete => self.with_focused(MaskedField::delete_next),
            KeyCode::Left => self.with_focused(MaskedField::move_left),
            KeyCode::Right => self.with_focused(MaskedField::move_right),
            KeyCode::Home => self.with_focused(MaskedField::move_home),
            KeyCode::End => self.with_focused(MaskedField::move_end),
            _ => {}
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        self.with_focused(|field| field.paste(text));
    }

    pub fn rows(&self) -> Vec<Row> {
        let label_width = self
            .form
            .iter()
            .map(|attached| label_of(&attached.descriptor, attached.field.id()).width())
            .max()
            .unwrap_or(0);

        self.form
            .iter()
            .enumerate()
            .map(|(index, attached)| {
                let focused = index == self.focus;
                let marker = if focused { '>' } else { ' ' };
                let label = label_of(&attached.descriptor, attached.field.id());
                let prefix = format!("{marker} {label:<label_width$}  ");
                let field = &attached.field;
                let (before, _) = crate::text_edit::split_at_char(field.text(), field.cursor());
                Row {
                    cursor_column: prefix.width() + before.width(),
                    text: format!("{prefix}{}", field.text()),
                    focused,
                }
            })
            .collect()
    }

    pub fn render(&mut self, terminal: &mut Terminal) -> io::Result<()> {
        let rows = self.rows();
        let max_column = usize::from(terminal.width().saturating_sub(1));

        terminal.queue_move_up(self.drawn_rows.saturating_sub(1))?;
        terminal.queue_move_to_column(0)?;
        terminal.queue_clear_from_cursor_down()?;
        for (index, row) in rows.iter().enumerate() {
            if index > 0 {
                terminal.queue_newline()?;
            }
            terminal.queue_line(row.text.as_str(), row.focused)?;
        }
        self.drawn_rows = u16::try_from(rows.len()).unwrap_or(u16::MAX);

        if let Some(row) = rows.get(self.focus) {
            let below = rows.len().saturating_sub(self.focus + 1);
            terminal.queue_move_up(u16::try_from(below).unwrap_or(u16::MAX))?;
            let column = row.cursor_column.min(max_column);
            terminal.queue_move_to_column(u16::try_from(column).unwrap_or(u16::MAX))?;
            // the next frame starts from the focused row
            self.drawn_rows = self.drawn_rows.saturating_sub(below as u16);
        }
        terminal.flush()
    }

    /// Leaves the caret below the last drawn row.
    pub fn finish(&mut self, terminal: &mut Terminal) -> io::Result<()> {
        let below = self.form.len().saturating_sub(self.focus + 1);
        for _ in 0..below {
            terminal.queue_newline()?;
        }
        terminal.queue_newline()?;
        terminal.flush()
    }

    fn move_focus(&mut self, delta: isize) {
        let len = self.form.len();
        if len == 0 {
            return;
        }
        self.focus = (self.focus as isize + delta).rem_euclid(len as isize) as usize;
        debug!("focus moved to field #{}", self.focus);
    }

    fn with_focused(&mut self, edit: impl FnOnce(&mut MaskedField) -> bool) {
        if let Some(field) = self.form.field_at_mut(self.focus) {
            edit(field);
        }
    }
}

/// Fields shown by the demo when no page is given.
pub fn demo_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::input().with_id("id_cnpj").with_name("cnpj"),
        FieldDescriptor::input().with_id("id_cpf").with_name("cpf"),
        FieldDescriptor::input()
            .with_id("id_telefone")
            .with_name("telefone"),
        FieldDescriptor::input().with_id("id_cep").with_name("cep"),
        FieldDescriptor::input().with_id("id_placa").with_name("placa"),
        FieldDescriptor::input().with_id("id_ano").with_name("ano"),
        FieldDescriptor::input()
            .with_id("id_valor")
            .with_name("valor")
            .with_type("number")
            .with_attr("step", "0.01")
            .with_value("1234.5"),
    ]
}

fn label_of<'a>(descriptor: &'a FieldDescriptor, fallback: &'a str) -> &'a str {
    descriptor.name().unwrap_or(fallback)
}
