//! Owns the terminal while anfeeds runs.
//!
//! [`Screen`] puts stderr into raw mode on the alternate screen and hands it
//! back when [`Screen::leave`] is called or the value is dropped, so every way
//! out of the event loop ends with a usable shell. A panic hook restores the
//! terminal before the panic message prints.

use std::io::{self, BufWriter, Stderr, stderr};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Once};

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};
use signal_hook::consts::SIGTERM;

type Backend = CrosstermBackend<BufWriter<Stderr>>;

static PANIC_HOOK: Once = Once::new();

/// The alternate screen in raw mode, with mouse capture for the scroll wheel.
pub struct Screen {
    terminal: Terminal<Backend>,
    active: bool,
}

impl Screen {
    /// Switches the terminal over. On failure, whatever was already switched
    /// is put back before the error is returned.
    pub fn enter() -> io::Result<Self> {
        PANIC_HOOK.call_once(|| {
            let previous = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                let _ = reset();
                previous(info);
            }));
        });

        let setup = || -> io::Result<Terminal<Backend>> {
            enable_raw_mode()?;
            // Buffered so one frame goes out in few writes.
            let mut out = BufWriter::new(stderr());
            execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
            Terminal::new(CrosstermBackend::new(out))
        };
        let terminal = setup().inspect_err(|_| {
            let _ = reset();
        })?;
        Ok(Self { terminal, active: true })
    }

    /// Draws one frame.
    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> io::Result<()> {
        self.terminal.draw(render).map(|_| ())
    }

    /// Gives the terminal back, reporting any failure.
    pub fn leave(mut self) -> io::Result<()> {
        self.active = false;
        reset()
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        if self.active {
            let _ = reset();
        }
    }
}

fn reset() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stderr(), LeaveAlternateScreen, DisableMouseCapture)
}

/// Flag raised when the process receives SIGTERM; the event loop polls it.
pub fn sigterm_flag() -> io::Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(SIGTERM, Arc::clone(&flag))?;
    Ok(flag)
}
