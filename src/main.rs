use clap::Parser;
use fieldmask::app::{App, demo_fields};
use fieldmask::registry::MaskRegistry;
use fieldmask::terminal::{Terminal, TerminalEvent};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Edit masked form fields in the terminal; Enter prints the unmasked values.
#[derive(Debug, Parser)]
#[command(name = "fieldmask-demo", version)]
struct Args {
    /// YAML rule file replacing the built-in rules.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
    }
}

fn run() -> io::Result<()> {
    let args = Args::parse();
    let registry = match &args.config {
        Some(path) => MaskRegistry::load(path).map_err(io::Error::other)?,
        None => MaskRegistry::builtin(),
    };
    let mut app = App::new(registry.attach(demo_fields()));

    let mut terminal = Terminal::new()?;
    terminal.enter_raw_mode()?;
    terminal.set_line_wrap(false)?;

    let result = event_loop(&mut terminal, &mut app);

    terminal.set_line_wrap(true)?;
    terminal.exit_raw_mode()?;
    result?;

    if let Some(values) = app.submission() {
        let json = serde_json::to_string_pretty(&values).map_err(io::Error::other)?;
        println!("{json}");
    }
    Ok(())
}

fn event_loop(terminal: &mut Terminal, app: &mut App) -> io::Result<()> {
    let mut render_requested = true;

    loop {
        if render_requested {
            app.render(terminal)?;
            render_requested = false;
        }

        if app.should_exit() {
            break;
        }

        if terminal.poll(Duration::from_millis(100))? {
            match terminal.read_event()? {
                TerminalEvent::Key(key_event) => app.handle_key(key_event),
                TerminalEvent::Paste(text) => app.handle_paste(text.as_str()),
                TerminalEvent::Resize { .. } => {}
            }
            render_requested = true;
        }
    }

    app.finish(terminal)
}
