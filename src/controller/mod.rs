//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input and
//! runs remote work off the UI loop. It is organized into submodules by
//! responsibility:
//!
//! - `input`: Key event handling
//! - `commands`: Search and shuffle commands, and folding their results back
//!   into the model
//!
//! Commands run on spawned tokio tasks. Their results travel back over an
//! unbounded channel as [`ControllerEvent`]s, which the UI loop drains and
//! applies with [`AppController::apply_event`].

mod input;
mod commands;

use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

use crate::model::{AppModel, PlaylistSummary, ShuffleOutcome};

/// Result of a background command, delivered to the UI loop
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControllerEvent {
    SearchCompleted(Vec<PlaylistSummary>),
    ShuffleCompleted {
        playlist: String,
        outcome: ShuffleOutcome,
    },
}

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    events: mpsc::UnboundedSender<ControllerEvent>,
}

impl AppController {
    pub fn new(model: Arc<Mutex<AppModel>>) -> (Self, mpsc::UnboundedReceiver<ControllerEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        (Self { model, events }, receiver)
    }

    pub(crate) fn format_error(error: &str) -> String {
        // Handle common Spotify API errors
        if error.contains("404") {
            "Not found. The playlist or device may have been removed.".to_string()
        } else if error.contains("403") {
            "Action forbidden. Playback control needs Spotify Premium.".to_string()
        } else if error.contains("401") {
            "Authentication expired. Please restart the app.".to_string()
        } else if error.contains("429") {
            "Rate limited. Please wait a moment.".to_string()
        } else {
            format!("Error: {}", error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_error_maps_status_codes() {
        assert_eq!(
            AppController::format_error("status code 429 Too Many Requests"),
            "Rate limited. Please wait a moment."
        );
        assert!(AppController::format_error("status code 401").starts_with("Authentication expired"));
        assert_eq!(AppController::format_error("socket closed"), "Error: socket closed");
    }
}
