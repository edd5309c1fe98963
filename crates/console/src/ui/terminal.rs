use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;

pub(crate) type ConsoleTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Owns the raw-mode alternate screen and gives it back on drop, so an early
/// `?` in the event loop still leaves the shell usable.
pub(crate) struct TerminalGuard {
    terminal: ConsoleTerminal,
    restored: bool,
}

impl TerminalGuard {
    pub(crate) fn enter() -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = stdout.execute(EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self {
            terminal,
            restored: false,
        })
    }

    pub(crate) fn terminal(&mut self) -> &mut ConsoleTerminal {
        &mut self.terminal
    }

    pub(crate) fn restore(&mut self) -> anyhow::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode()?;
        self.terminal.backend_mut().execute(LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            tracing::warn!(error = %err, "failed to restore terminal");
        }
    }
}
