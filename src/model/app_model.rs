//! Main application model with state management

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::spotify_client::SpotifyClient;
use super::types::{ActiveSection, CommandState, PlaylistEntry, PlaylistSummary, UiState};

const ERROR_DISPLAY_DURATION: Duration = Duration::from_secs(5);

/// Main application model containing all state
pub struct AppModel {
    pub spotify: Option<SpotifyClient>,
    pub ui_state: Arc<Mutex<UiState>>,
    pub should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new() -> Self {
        Self {
            spotify: None,
            ui_state: Arc::new(Mutex::new(UiState::default())),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    pub fn set_spotify_client(&mut self, client: SpotifyClient) {
        self.spotify = Some(client);
    }

    pub async fn get_spotify_client(&self) -> Option<SpotifyClient> {
        self.spotify.clone()
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn toggle_section(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.toggle();
    }

    pub async fn set_active_section(&self, section: ActiveSection) {
        self.ui_state.lock().await.active_section = section;
    }

    // ========================================================================
    // Search input
    // ========================================================================

    pub async fn append_to_search(&self, c: char) {
        self.ui_state.lock().await.search_query.push(c);
    }

    pub async fn backspace_search(&self) {
        self.ui_state.lock().await.search_query.pop();
    }

    pub async fn clear_search(&self) {
        self.ui_state.lock().await.search_query.clear();
    }

    // ========================================================================
    // Command lifecycle
    // ========================================================================

    /// Move search to `Running` unless it already is. Returns whether it moved.
    pub async fn begin_search(&self) -> bool {
        let mut state = self.ui_state.lock().await;
        if state.search_state == CommandState::Running {
            return false;
        }
        state.search_state = CommandState::Running;
        true
    }

    /// Replace the rendered entries with `playlists` and return search to `Idle`
    pub async fn finish_search(&self, playlists: &[PlaylistSummary]) {
        let mut state = self.ui_state.lock().await;
        state.entries = playlists.iter().map(PlaylistEntry::from).collect();
        state.selected = 0;
        state.search_state = CommandState::Idle;
    }

    /// Move shuffle to `Running` unless it already is. Returns whether it moved;
    /// a running shuffle keeps its status line.
    pub async fn begin_shuffle(&self, playlist_name: &str) -> bool {
        let mut state = self.ui_state.lock().await;
        if state.shuffle_state == CommandState::Running {
            return false;
        }
        state.shuffle_state = CommandState::Running;
        state.status_message = Some(format!("Shuffling \"{}\"...", playlist_name));
        true
    }

    pub async fn finish_shuffle(&self) {
        self.ui_state.lock().await.shuffle_state = CommandState::Idle;
    }

    // ========================================================================
    // Playlist list
    // ========================================================================

    pub async fn move_selection_up(&self) {
        let mut state = self.ui_state.lock().await;
        state.selected = state.selected.saturating_sub(1);
    }

    pub async fn move_selection_down(&self) {
        let mut state = self.ui_state.lock().await;
        if state.selected < state.entries.len().saturating_sub(1) {
            state.selected += 1;
        }
    }

    pub async fn get_selected_entry(&self) -> Option<PlaylistEntry> {
        let state = self.ui_state.lock().await;
        state.entries.get(state.selected).cloned()
    }

    // ========================================================================
    // Messages
    // ========================================================================

    pub async fn set_status(&self, message: String) {
        self.ui_state.lock().await.status_message = Some(message);
    }

    pub async fn clear_status(&self) {
        self.ui_state.lock().await.status_message = None;
    }

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.error_timestamp {
            if timestamp.elapsed() >= ERROR_DISPLAY_DURATION {
                state.error_message = None;
                state.error_timestamp = None;
            }
        }
    }
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new()
    }
}
