use anyhow::{bail, Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::{IsTerminal, Write};

#[derive(Debug, PartialEq)]
pub enum Entry {
    Editing,
    Done,
    Cancelled,
}

/// Apply one key press to a hidden input buffer.
pub fn apply_key(buf: &mut String, key: KeyEvent) -> Entry {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => Entry::Done,
        KeyCode::Esc => Entry::Cancelled,
        KeyCode::Char('c') | KeyCode::Char('d') if ctrl => Entry::Cancelled,
        KeyCode::Backspace => {
            buf.pop();
            Entry::Editing
        }
        KeyCode::Char(c) if !ctrl => {
            buf.push(c);
            Entry::Editing
        }
        _ => Entry::Editing,
    }
}

/// Prompt for a password without echoing it. Piped input is read as a line.
pub fn password(label: &str) -> Result<String> {
    print!("  {}: ", label);
    std::io::stdout().flush()?;

    if !std::io::stdin().is_terminal() {
        let mut line = String::new();
        std::io::stdin()
            .read_line(&mut line)
            .context("Failed to read password")?;
        return Ok(line.trim_end_matches(['\r', '\n']).to_string());
    }

    enable_raw_mode()?;
    let result = read_hidden();
    disable_raw_mode()?;
    println!();

    match result? {
        Some(value) => Ok(value),
        None => bail!("Password entry cancelled"),
    }
}

fn read_hidden() -> Result<Option<String>> {
    let mut buf = String::new();
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match apply_key(&mut buf, key) {
                Entry::Editing => {}
                Entry::Done => return Ok(Some(buf)),
                Entry::Cancelled => return Ok(None),
            }
        }
    }
}
