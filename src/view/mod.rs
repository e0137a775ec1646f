//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `layout`: Main layout pieces (search bar, playlist list, status bar)
//! - `overlays`: Modal overlays (error notification)

mod layout;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::UiState;

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, ui_state: &UiState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search bar
                Constraint::Min(0),    // Playlists
                Constraint::Length(3), // Status line
            ])
            .split(frame.area());

        layout::render_search_bar(frame, chunks[0], ui_state);
        layout::render_playlists(frame, chunks[1], ui_state);
        layout::render_status_bar(frame, chunks[2], ui_state);

        // Error notification overlay (if there's an error)
        if ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, ui_state);
        }
    }
}
