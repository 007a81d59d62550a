//! Keeping the window open until the operator has read the output.

use std::io::{self, IsTerminal as _};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal;

pub struct Console {
    interactive: bool,
}

impl Console {
    /// Prompts are skipped when `pause` is off or stdin is not a terminal.
    pub fn new(pause: bool) -> Self {
        Console {
            interactive: pause && io::stdin().is_terminal(),
        }
    }

    pub fn pause(&self, message: &str) {
        if !self.interactive {
            return;
        }
        println!("\n{message}");
        if let Err(err) = read_key() {
            tracing::debug!("failed to wait for a key press: {err}");
        }
    }

    /// Offer the diagnostic dump, `true` if the operator pressed `v`.
    pub fn wants_debug(&self) -> bool {
        if !self.interactive {
            return false;
        }
        println!("\n--- Press \"v\" for debug values, or any other key to quit ---");
        matches!(read_key(), Ok(KeyCode::Char('v' | 'V')))
    }
}

fn read_key() -> io::Result<KeyCode> {
    terminal::enable_raw_mode()?;
    let key = loop {
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => break Ok(key.code),
            Ok(_) => continue,
            Err(err) => break Err(err),
        }
    };
    terminal::disable_raw_mode()?;
    key
}
