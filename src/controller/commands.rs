//! Search and shuffle commands

use crate::model::{Pacing, PlaylistEntry, ShuffleOutcome, SHUFFLE_PLAYLIST_NAME};

use super::{AppController, ControllerEvent};

/// What the user should see after a shuffle
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Notice {
    Status(String),
    Error(String),
}

impl AppController {
    /// Filter playlists by the current search query on a background task.
    ///
    /// Ignored while a previous search is still running.
    pub async fn submit_search(&self) {
        let model = self.model.lock().await;
        let Some(spotify) = model.get_spotify_client().await else {
            return;
        };
        if !model.begin_search().await {
            tracing::debug!("Search already running, ignoring submission");
            return;
        }
        let query = model.get_ui_state().await.search_query;
        drop(model);

        tracing::debug!(query = %query, "Performing search");
        let events = self.events.clone();
        tokio::spawn(async move {
            let playlists = spotify.search(&query).await;
            if events.send(ControllerEvent::SearchCompleted(playlists)).is_err() {
                tracing::debug!("UI loop closed before search finished");
            }
        });
    }

    /// Shuffle the playlist behind `entry` into the shuffle playlist and start
    /// playback, on a background task.
    ///
    /// Ignored while a previous shuffle is still running.
    pub async fn activate(&self, entry: PlaylistEntry) {
        let model = self.model.lock().await;
        let Some(spotify) = model.get_spotify_client().await else {
            return;
        };
        if !model.begin_shuffle(&entry.name).await {
            tracing::debug!(playlist = %entry.name, "Shuffle already running, ignoring activation");
            return;
        }
        drop(model);

        tracing::info!(playlist = %entry.name, "Shuffle requested");
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = spotify.shuffle_and_play(&entry.name).await;
            let event = ControllerEvent::ShuffleCompleted {
                playlist: entry.name,
                outcome,
            };
            if events.send(event).is_err() {
                tracing::debug!("UI loop closed before shuffle finished");
            }
        });
    }

    /// Fold a finished command into the model. Runs on the UI loop.
    pub async fn apply_event(&self, event: ControllerEvent) {
        let model = self.model.lock().await;

        match event {
            ControllerEvent::SearchCompleted(playlists) => {
                tracing::debug!(count = playlists.len(), "Search results ready");
                model.finish_search(&playlists).await;
            }
            ControllerEvent::ShuffleCompleted { playlist, outcome } => {
                model.finish_shuffle().await;
                match Self::describe_outcome(&playlist, &outcome) {
                    Notice::Status(message) => model.set_status(message).await,
                    Notice::Error(message) => {
                        model.clear_status().await;
                        model.set_error(message).await;
                    }
                }
            }
        }
    }

    pub(crate) fn describe_outcome(playlist: &str, outcome: &ShuffleOutcome) -> Notice {
        match outcome {
            ShuffleOutcome::Playing {
                tracks,
                failed_batches,
                ..
            }
            | ShuffleOutcome::NoActiveDevice {
                tracks,
                failed_batches,
            } if *failed_batches >= tracks.div_ceil(Pacing::BATCH_SIZE) => Notice::Error(format!(
                "Could not add any of the {} tracks from \"{}\" to \"{}\"",
                tracks, playlist, SHUFFLE_PLAYLIST_NAME
            )),
            ShuffleOutcome::Playing {
                tracks,
                failed_batches,
                device,
            } => Notice::Status(format!(
                "Playing {} shuffled tracks from \"{}\" on {}{}",
                tracks,
                playlist,
                device,
                Self::failed_suffix(*failed_batches)
            )),
            ShuffleOutcome::NoActiveDevice {
                tracks,
                failed_batches,
            } => Notice::Status(format!(
                "Shuffled {} tracks into \"{}\"{}. No active device found, open Spotify somewhere to play it.",
                tracks,
                SHUFFLE_PLAYLIST_NAME,
                Self::failed_suffix(*failed_batches)
            )),
            ShuffleOutcome::NotFound => {
                Notice::Error(format!("No playlist found matching \"{}\"", playlist))
            }
            ShuffleOutcome::NoValidTracks => {
                Notice::Error(format!("No valid tracks found in \"{}\"", playlist))
            }
            ShuffleOutcome::Busy => {
                Notice::Status("A shuffle is already running, try again when it finishes".to_string())
            }
            ShuffleOutcome::NetworkError(reason) => Notice::Error(Self::format_error(reason)),
        }
    }

    fn failed_suffix(failed_batches: usize) -> String {
        if failed_batches == 0 {
            String::new()
        } else {
            format!(" ({} batches failed)", failed_batches)
        }
    }
}
