//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for the application.
//! It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (playlists, devices, outcomes, UI state)
//! - `service`: Remote music service port and its rspotify implementation
//! - `tracks`: Track URI validation and shuffling
//! - `spotify_client`: Playlist search and shuffle-and-play
//! - `app_model`: Main application model with state management methods

mod types;
mod service;
mod tracks;
mod spotify_client;
mod app_model;

#[cfg(test)]
pub(crate) mod fake;

// Re-export all public types for convenient access
pub use types::{
    ActiveSection, CommandState, PlaylistEntry, PlaylistSummary, ShuffleOutcome, UiState,
    SHUFFLE_PLAYLIST_NAME,
};

pub use service::{MusicService, RspotifyService};

pub use spotify_client::{Pacing, SpotifyClient};

pub use app_model::AppModel;
