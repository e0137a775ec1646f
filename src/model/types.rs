//! Core type definitions for the application

use std::time::Instant;

/// Name of the scratch playlist that receives every shuffled copy
pub const SHUFFLE_PLAYLIST_NAME: &str = "Spotify Shuffle";

/// A user's playlist as fetched from the remote service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub uri: String,
}

/// Information about a Spotify playback device
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceInfo {
    pub id: Option<String>,
    pub name: String,
    pub is_active: bool,
}

/// One page of a paginated remote listing
#[derive(Clone, Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Offset of the following page, `None` on the last page
    pub next_offset: Option<u32>,
}

/// Result of a shuffle request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShuffleOutcome {
    /// Shuffle playlist rebuilt and playback started on `device`
    Playing {
        tracks: usize,
        failed_batches: usize,
        device: String,
    },
    /// Shuffle playlist rebuilt, but there was no device to play on
    NoActiveDevice { tracks: usize, failed_batches: usize },
    /// No playlist with that name in the current search results
    NotFound,
    /// The playlist holds no playable tracks; nothing was written
    NoValidTracks,
    /// Another shuffle is still writing to the shuffle playlist
    Busy,
    NetworkError(String),
}

/// Which part of the UI receives key input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveSection {
    Search,
    Playlists,
}

impl ActiveSection {
    pub fn toggle(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::Playlists,
            ActiveSection::Playlists => ActiveSection::Search,
        }
    }
}

/// Lifecycle of a user command
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CommandState {
    #[default]
    Idle,
    Running,
}

/// A rendered, activatable playlist row. Owns the name it was built from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub name: String,
}

impl From<&PlaylistSummary> for PlaylistEntry {
    fn from(playlist: &PlaylistSummary) -> Self {
        Self {
            name: playlist.name.clone(),
        }
    }
}

/// UI state for the application
#[derive(Clone, Debug)]
pub struct UiState {
    pub active_section: ActiveSection,
    pub search_query: String,
    pub search_state: CommandState,
    pub shuffle_state: CommandState,
    pub entries: Vec<PlaylistEntry>,
    pub selected: usize,
    pub status_message: Option<String>,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_section: ActiveSection::Search,
            search_query: String::new(),
            search_state: CommandState::Idle,
            shuffle_state: CommandState::Idle,
            entries: vec![],
            selected: 0,
            status_message: None,
            error_message: None,
            error_timestamp: None,
        }
    }
}
