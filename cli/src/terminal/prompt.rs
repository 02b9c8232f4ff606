use std::io::{self, BufRead, IsTerminal, Write};

use colored::*;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use netrun_common::credentials::{CredentialPrompt, Password};
use netrun_common::error::CredentialError;

use crate::terminal::{colors, print};

/// Asks for missing credentials on the controlling terminal.
pub struct TerminalPrompt;

/// Leaves raw mode even when reading a key fails halfway.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

fn ask(label: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "{} ", format!("{label}:").color(colors::TEXT_DEFAULT))?;
    stdout.flush()
}

fn read_line(what: &'static str) -> Result<String, CredentialError> {
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Err(CredentialError::InputUnavailable(what));
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn read_masked() -> Result<String, CredentialError> {
    let _guard = RawModeGuard::enable()?;
    let mut stdout = io::stdout();
    let mut secret = String::new();

    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Enter => break,
            KeyCode::Esc => return Err(CredentialError::Interrupted),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(CredentialError::Interrupted);
            }
            KeyCode::Backspace => {
                if secret.pop().is_some() {
                    write!(stdout, "\x08 \x08")?;
                }
            }
            KeyCode::Char(c) => {
                secret.push(c);
                write!(stdout, "*")?;
            }
            _ => {}
        }
        stdout.flush()?;
    }

    write!(stdout, "\r\n")?;
    stdout.flush()?;
    Ok(secret)
}

impl CredentialPrompt for TerminalPrompt {
    fn announce(&mut self) {
        print::banner("Please enter device credentials:");
    }

    fn username(&mut self) -> Result<String, CredentialError> {
        ask("Username")?;
        read_line("username")
    }

    fn password(&mut self) -> Result<Password, CredentialError> {
        ask("Password")?;
        let secret: String = if io::stdin().is_terminal() {
            read_masked()?
        } else {
            read_line("password")?
        };
        Ok(Password::from(secret))
    }
}
