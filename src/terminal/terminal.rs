use crate::terminal::{KeyCode, KeyEvent, KeyModifiers, TerminalEvent};
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind, poll, read,
};
use crossterm::style::{Attribute, SetAttribute};
use crossterm::{cursor, execute, queue, terminal};
use std::io::{self, Stdout, Write};
use std::time::Duration;

pub struct Terminal {
    stdout: Stdout,
    width: u16,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let (width, _) = terminal::size()?;
        Ok(Self {
            stdout: io::stdout(),
            width,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn enter_raw_mode(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(self.stdout, EnableBracketedPaste)
    }

    pub fn exit_raw_mode(&mut self) -> io::Result<()> {
        execute!(self.stdout, DisableBracketedPaste)?;
        terminal::disable_raw_mode()
    }

    pub fn set_line_wrap(&mut self, enabled: bool) -> io::Result<()> {
        if enabled {
            execute!(self.stdout, terminal::EnableLineWrap)?;
        } else {
            execute!(self.stdout, terminal::DisableLineWrap)?;
        }
        Ok(())
    }

    pub fn poll(&self, timeout: Duration) -> io::Result<bool> {
        poll(timeout)
    }

    pub fn read_event(&mut self) -> io::Result<TerminalEvent> {
        loop {
            match read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    return Ok(TerminalEvent::Key(map_key_event(key)));
                }
                Event::Paste(text) => return Ok(TerminalEvent::Paste(text)),
                Event::Resize(width, height) => {
                    self.width = width;
                    return Ok(TerminalEvent::Resize { width, height });
                }
                _ => continue,
            }
        }
    }

    pub fn queue_move_up(&mut self, rows: u16) -> io::Result<()> {
        if rows > 0 {
            queue!(self.stdout, cursor::MoveUp(rows))?;
        }
        Ok(())
    }

    pub fn queue_move_to_column(&mut self, column: u16) -> io::Result<()> {
        queue!(self.stdout, cursor::MoveToColumn(column))
    }

    pub fn queue_clear_from_cursor_down(&mut self) -> io::Result<()> {
        queue!(
            self.stdout,
            terminal::Clear(terminal::ClearType::FromCursorDown)
        )
    }

    /// Writes one line of text; `bold` highlights the focused field label.
    pub fn queue_line(&mut self, text: &str, bold: bool) -> io::Result<()> {
        if bold {
            queue!(self.stdout, SetAttribute(Attribute::Bold))?;
        }
        write!(self.stdout, "{text}")?;
        if bold {
            queue!(self.stdout, SetAttribute(Attribute::Reset))?;
        }
        Ok(())
    }

    pub fn queue_newline(&mut self) -> io::Result<()> {
        write!(self.stdout, "\r\n")
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

fn map_key_event(event: crossterm::event::KeyEvent) -> KeyEvent {
    use crossterm::event::{KeyCode as Code, KeyModifiers as Mods};

    let code = match event.code {
        Code::Char(ch) => KeyCode::Char(ch),
        Code::Backspace => KeyCode::Backspace,
        Code::Delete => KeyCode::Delete,
        Code::Enter => KeyCode::Enter,
        Code::Esc => KeyCode::Esc,
        Code::Tab => KeyCode::Tab,
        Code::BackTab => KeyCode::BackTab,
        Code::Left => KeyCode::Left,
        Code::Right => KeyCode::Right,
        Code::Up => KeyCode::Up,
        Code::Down => KeyCode::Down,
        Code::Home => KeyCode::Home,
        Code::End => KeyCode::End,
        _ => KeyCode::Other,
    };

    let mut modifiers = KeyModifiers::NONE;
    for (theirs, ours) in [
        (Mods::SHIFT, KeyModifiers::SHIFT),
        (Mods::CONTROL, KeyModifiers::CONTROL),
        (Mods::ALT, KeyModifiers::ALT),
    ] {
        if event.modifiers.contains(theirs) {
            modifiers |= ours;
        }
    }

    KeyEvent { code, modifiers }
}
