use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    cursor,
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, EnvFilter};

mod app;
mod cli;
mod config;
mod error;
mod inventory;
mod models;
mod ssh_service;
mod ui;

use app::{map_key, App, Input};
use cli::Cli;
use config::ConfigManager;
use ssh_service::RemoteRunner;

fn init_logging(log_dir: &Path) -> Result<()> {
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // One log file per run, named by start time
    let log_file = log_dir.join(format!("vtui_{}.log", Local::now().format("%Y%m%d_%H%M%S")));
    let file = File::create(&log_file).context("Failed to create log file")?;

    fmt()
        .with_max_level(Level::DEBUG)
        .with_env_filter(EnvFilter::from_default_env().add_directive("vtui=debug".parse()?))
        .with_ansi(false)
        .with_writer(file)
        .init();

    Ok(())
}

/// Raw mode plus the alternate screen on `W`. Dropping it restores the
/// terminal, including when setup or the loop bails out with `?`.
struct TerminalGuard<W: Write> {
    writer: W,
}

impl<W: Write> TerminalGuard<W> {
    fn enter(writer: W) -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut guard = Self { writer };
        execute!(guard.writer, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        Ok(guard)
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        // Best effort, errors are ignored
        let _ = disable_raw_mode();
        let _ = execute!(self.writer, LeaveAlternateScreen, cursor::Show);
    }
}

fn main() -> Result<()> {
    let config_manager = ConfigManager::new()?;
    init_logging(&config_manager.log_dir())?;

    debug!("Starting vtui...");

    debug!("Config file: {:?}", config_manager.config_path());
    let config = config_manager.load_config()?;
    let cli = Cli::parse_for(&config);
    let app = App::new(cli.hostname, config.ssh_runner());

    let guard = TerminalGuard::enter(io::stdout())?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let res = run_app(&mut terminal, app);

    // Restore terminal before reporting anything on stderr
    drop(terminal);
    drop(guard);

    if let Err(err) = res {
        tracing::error!("{:?}", err);
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// One input at a time; remote calls block the loop until ssh returns.
fn run_app<B: ratatui::backend::Backend, R: RemoteRunner>(
    terminal: &mut Terminal<B>,
    mut app: App<R>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if let Some(input) = map_key(key) {
                    if input == Input::Activate {
                        if let Some(work) = app.pending_remote_work() {
                            let message = format!("Running {} on {}...", work, app.host());
                            app.set_status(message);
                            terminal.draw(|f| ui::draw(f, &mut app))?;
                        }
                    }
                    app.on_input(input);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropping_the_guard_leaves_the_alternate_screen() {
        let mut out = Vec::new();
        {
            let _guard = TerminalGuard { writer: &mut out };
        }
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("\x1b[?1049l"));
        assert!(text.contains("\x1b[?25h"));
    }
}
