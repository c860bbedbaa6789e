//! JContacts TUI - terminal contact manager
//!
//! Built with Ratatui and crossterm.

mod app;
mod form;
mod handlers;
mod theme;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use jcontacts_core::ContactStore;
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use app::{App, AppState};

/// JContacts - manage your contacts from the terminal
#[derive(Parser, Debug)]
#[command(name = "jcontacts-tui", version)]
#[command(about = "A terminal UI for JContacts contact lists")]
struct Args {
    /// Path to the contacts document (defaults to the per-user data directory)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Don't look for a newer version on startup
    #[arg(long)]
    no_update_check: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("jcontacts_tui=info".parse()?))
        .with_writer(std::io::stderr) // keep logs out of the TUI
        .init();

    let args = Args::parse();

    let mut store = match args.data {
        Some(path) => ContactStore::new(path),
        None => ContactStore::open_default()?,
    };
    tracing::info!("Starting JContacts with document: {}", store.path().display());
    store.refresh().context("Can't load contacts")?;

    let mut app = App::new(store);
    if !args.no_update_check {
        app.check_for_updates();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.poll_background();
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handlers::handle_key(app, key) {
                    break;
                }
            }
        }

        if matches!(app.state, AppState::Quit) {
            break;
        }
    }

    Ok(())
}
