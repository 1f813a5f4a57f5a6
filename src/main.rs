mod auth;
mod controller;
mod logging;
mod model;
mod view;

#[cfg(test)]
mod testing;

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use auth::SessionAccessor;
use controller::{AppContext, AppController};
use model::{SpotifyClientFactory, Store};
use view::AppView;

const TOKEN_CHECK_INTERVAL: Duration = Duration::from_secs(60);
const INPUT_POLL: Duration = Duration::from_millis(50);

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = match logging::init_logging() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {}", e);
            None
        }
    };

    tracing::info!("=== spotify-sync starting ===");

    let session = SessionAccessor::new();
    session.replace(Some(auth::perform_oauth_flow().await?));

    let store = Arc::new(Store::new());
    let clients = Arc::new(SpotifyClientFactory::new(session.clone()));
    let controller = AppController::new(AppContext::new(store, clients));

    let effects = controller.spawn_effects(session.subscribe());

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &session, &controller).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    for handle in effects {
        handle.abort();
    }

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("spotify-sync shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    session: &SessionAccessor,
    controller: &AppController,
) -> io::Result<()> {
    let store = controller.store();
    let mut last_token_check = Instant::now();

    loop {
        // The identity provider owns refresh; we only nudge it
        if last_token_check.elapsed() >= TOKEN_CHECK_INTERVAL {
            last_token_check = Instant::now();
            let session = session.clone();
            tokio::spawn(async move {
                if let Err(e) = session.refresh_if_needed().await {
                    tracing::warn!("Token refresh check failed: {}", e);
                }
            });
        }

        let playback = store.playback_snapshot();
        let library = store.library_snapshot();

        terminal.draw(|f| {
            AppView::render(f, &playback, &library);
        })?;

        // crossterm polling blocks, keep it off the runtime workers
        let key = tokio::task::block_in_place(|| -> io::Result<Option<event::KeyEvent>> {
            if event::poll(INPUT_POLL)? {
                if let Event::Key(key) = event::read()? {
                    return Ok(Some(key));
                }
            }
            Ok(None)
        })?;

        if let Some(key) = key {
            controller.handle_key_event(key);
        }

        if store.should_quit.get() {
            break;
        }
    }

    Ok(())
}
