mod auth;
mod config;
mod controller;
mod logging;
mod model;
mod view;

use std::io;
use std::sync::Arc;
use anyhow::{Context, Result};
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use view::AppView;
use config::AppConfig;
use controller::{AppController, ControllerEvent};
use model::{AppModel, MusicService, Pacing, RspotifyService, SpotifyClient};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== Spotify Shuffle Starting ===");

    let config = AppConfig::from_env()?;

    // Authorization may prompt on stdin, so it runs before the terminal is taken over
    let rspotify_client = auth::perform_oauth_flow(&config).await?;

    let service: Arc<dyn MusicService> = Arc::new(RspotifyService::new(rspotify_client));
    let spotify_client = SpotifyClient::connect(service, Pacing::default())
        .await
        .context("Could not load your playlists from Spotify")?;

    tracing::info!(
        playlists = spotify_client.all_playlists().len(),
        "Playlists loaded"
    );

    let mut app_model = AppModel::new();
    app_model.finish_search(spotify_client.all_playlists()).await;
    app_model.set_spotify_client(spotify_client);

    let model = Arc::new(Mutex::new(app_model));
    let (controller, events) = AppController::new(model.clone());

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model, controller, events).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("Spotify Shuffle shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
    mut events: mpsc::UnboundedReceiver<ControllerEvent>,
) -> Result<()> {
    loop {
        // Fold in whatever background commands finished since the last frame
        while let Ok(event) = events.try_recv() {
            controller.apply_event(event).await;
        }

        let (ui_state, should_quit) = {
            let model_guard = model.lock().await;

            // Auto-clear old errors (after 5 seconds)
            model_guard.auto_clear_old_errors().await;

            (model_guard.get_ui_state().await, model_guard.should_quit().await)
        };

        if should_quit {
            break;
        }

        terminal.draw(|f| {
            AppView::render(f, &ui_state);
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }
    }

    Ok(())
}
