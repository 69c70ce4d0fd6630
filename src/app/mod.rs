//! TUI Application module

mod async_ops;
mod events;
mod state;
mod ui;

pub use state::AppState;
pub use state::FocusedPane;
pub use state::Mode;

use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::io::stdout;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::core::AppCore;
use crate::db::Database;
use crate::fetch::Fetcher;

use async_ops::{AsyncCommand, AsyncHandle, AsyncResult, spawn_worker};

/// Run the TUI application
pub fn run() -> Result<()> {
    // Create tokio runtime
    let rt = Runtime::new()?;

    // Load config
    let config = Config::load()?;
    let download_dir = config.download_dir()?;

    // Open database
    let db = Database::open()?;

    // The core gets its own blocking source; the worker fetches with a
    // second one so the event loop never blocks on the network
    let fetcher = Fetcher::new(config.topics.clone(), &download_dir)?;
    let core = AppCore::new(db, Box::new(fetcher));

    // Spawn async worker
    let async_handle =
        rt.block_on(async { spawn_worker(config.topics.clone(), download_dir.clone()) })?;

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Create app state
    let mut app_state = AppState::new(config, core);

    // Trigger the startup feed refresh off-thread
    let _ = async_handle.cmd_tx.blocking_send(AsyncCommand::RefreshFeed);
    app_state.loading = true;
    app_state.set_status("Loading feed...");

    // Main loop
    let result = run_app(&mut terminal, &mut app_state, async_handle);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
    mut async_handle: AsyncHandle,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    loop {
        // Process any async results
        while let Ok(result) = async_handle.result_rx.try_recv() {
            handle_async_result(state, result);
        }

        // Keep the count in the status line current across ingests
        if state.take_articles_dirty() && state.mode == Mode::Normal && !state.loading {
            tracing::trace!("[app] article view updated");
        }
        if state.take_projects_dirty() {
            tracing::debug!("[app] project list changed");
        }

        // Draw UI
        terminal.draw(|frame| ui::render(frame, state))?;

        // Handle events
        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && let Some(cmd) = events::handle_key(state, key)
        {
            let _ = async_handle.cmd_tx.blocking_send(cmd);
        }

        // Periodic refresh of today's entries, when configured
        let interval = state.config.refresh_interval_secs;
        if interval > 0 && last_refresh.elapsed() >= Duration::from_secs(interval) && !state.loading
        {
            last_refresh = Instant::now();
            state.loading = true;
            let _ = async_handle.cmd_tx.blocking_send(AsyncCommand::RefreshToday);
        }

        if state.should_quit {
            // Shutdown async worker
            let _ = async_handle.cmd_tx.blocking_send(AsyncCommand::Shutdown);
            break;
        }
    }

    // Save config on exit
    state.config.save()?;

    Ok(())
}

fn handle_async_result(state: &mut AppState, result: AsyncResult) {
    match result {
        AsyncResult::Fetched { articles } => {
            state.core.ingest(&articles);
            state.loading = false;
            state.set_status(format!(
                "Loaded {} articles",
                state.core.current_articles().len()
            ));
        }
        AsyncResult::Downloaded { paper_id, ok } => {
            if ok {
                state.set_status(format!("Downloaded {paper_id}.pdf"));
            } else {
                state.set_status(format!("Download of {paper_id} failed"));
            }
        }
        AsyncResult::AbstractFetched { link, text } => {
            if text.is_empty() {
                state.set_status("Could not fetch abstract");
            } else {
                state.core.apply_fetched_abstract(&link, &text);
            }
        }
        AsyncResult::Status { message } => {
            state.set_status(message);
        }
    }
}
