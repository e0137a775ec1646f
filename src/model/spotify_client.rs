//! Playlist search and shuffle-and-play on top of a [`MusicService`]

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{Mutex, RwLock};

use super::service::{MusicService, ServiceError};
use super::tracks::{filter_track_uris, shuffle_uris};
use super::types::{Page, PlaylistSummary, ShuffleOutcome, SHUFFLE_PLAYLIST_NAME};

/// Rate-limit pacing for writes to the shuffle playlist
#[derive(Clone, Copy, Debug)]
pub struct Pacing {
    /// Maximum URIs per add call
    pub batch_size: usize,
    /// Pause between two add calls
    pub batch_delay: Duration,
    /// Pause between the last write and starting playback
    pub settle_delay: Duration,
}

impl Pacing {
    pub const BATCH_SIZE: usize = 50;

    #[cfg(test)]
    pub fn immediate() -> Self {
        Self {
            batch_size: Self::BATCH_SIZE,
            batch_delay: Duration::ZERO,
            settle_delay: Duration::ZERO,
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            batch_size: Self::BATCH_SIZE,
            batch_delay: Duration::from_millis(500),
            settle_delay: Duration::from_secs(1),
        }
    }
}

/// Collect every item of a paginated listing, following `next_offset` until
/// the last page.
pub async fn collect_pages<T, F, Fut>(mut fetch: F) -> Result<Vec<T>, ServiceError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>, ServiceError>>,
{
    let mut items = Vec::new();
    let mut offset = 0;

    loop {
        let page = fetch(offset).await?;
        let was_empty = page.items.is_empty();
        items.extend(page.items);

        match page.next_offset {
            // An empty page or a non-advancing offset would loop forever
            Some(next) if !was_empty && next > offset => offset = next,
            _ => break,
        }
    }

    Ok(items)
}

/// Case-insensitive name filter preserving order. An empty term keeps everything.
pub fn filter_playlists(playlists: &[PlaylistSummary], term: &str) -> Vec<PlaylistSummary> {
    if term.is_empty() {
        return playlists.to_vec();
    }

    let needle = term.to_lowercase();
    playlists
        .iter()
        .filter(|playlist| playlist.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Playlist search and shuffling for the authenticated user
#[derive(Clone)]
pub struct SpotifyClient {
    service: Arc<dyn MusicService>,
    all_playlists: Arc<Vec<PlaylistSummary>>,
    filtered_playlists: Arc<RwLock<Vec<PlaylistSummary>>>,
    shuffle_playlist: Arc<RwLock<PlaylistSummary>>,
    // Held for the whole rebuild so two shuffles never interleave their writes
    shuffle_guard: Arc<Mutex<()>>,
    rng: Arc<Mutex<StdRng>>,
    pacing: Pacing,
}

impl SpotifyClient {
    pub async fn connect(service: Arc<dyn MusicService>, pacing: Pacing) -> Result<Self, ServiceError> {
        Self::connect_with_rng(service, pacing, StdRng::from_os_rng()).await
    }

    /// Fetch all playlists and make sure the shuffle playlist exists.
    ///
    /// `rng` drives every shuffle this client performs; seed it for
    /// reproducible orderings.
    pub async fn connect_with_rng(
        service: Arc<dyn MusicService>,
        pacing: Pacing,
        rng: StdRng,
    ) -> Result<Self, ServiceError> {
        let playlists = fetch_all_playlists(service.as_ref()).await?;
        tracing::info!(count = playlists.len(), "Loaded user playlists");

        let shuffle_playlist = ensure_shuffle_playlist(service.as_ref(), &playlists).await?;

        Ok(Self {
            service,
            filtered_playlists: Arc::new(RwLock::new(playlists.clone())),
            all_playlists: Arc::new(playlists),
            shuffle_playlist: Arc::new(RwLock::new(shuffle_playlist)),
            shuffle_guard: Arc::new(Mutex::new(())),
            rng: Arc::new(Mutex::new(rng)),
            pacing,
        })
    }

    pub fn all_playlists(&self) -> &[PlaylistSummary] {
        &self.all_playlists
    }

    pub async fn filtered_playlists(&self) -> Vec<PlaylistSummary> {
        self.filtered_playlists.read().await.clone()
    }

    pub async fn shuffle_playlist(&self) -> PlaylistSummary {
        self.shuffle_playlist.read().await.clone()
    }

    /// Recompute the filtered playlists for `term` from the cached full set
    pub async fn search(&self, term: &str) -> Vec<PlaylistSummary> {
        let filtered = filter_playlists(&self.all_playlists, term);
        tracing::debug!(term, matches = filtered.len(), "Filtered playlists");
        *self.filtered_playlists.write().await = filtered.clone();
        filtered
    }

    /// Copy the named playlist into the shuffle playlist in random order and
    /// start playing it on the first available device.
    ///
    /// Never fails: every error is logged and reported as an outcome.
    pub async fn shuffle_and_play(&self, playlist_name: &str) -> ShuffleOutcome {
        let Ok(_guard) = self.shuffle_guard.try_lock() else {
            tracing::warn!(playlist = playlist_name, "Shuffle already in progress, ignoring request");
            return ShuffleOutcome::Busy;
        };

        match self.rebuild_and_play(playlist_name).await {
            Ok(outcome) => {
                tracing::info!(playlist = playlist_name, ?outcome, "Shuffle finished");
                outcome
            }
            Err(e) => {
                tracing::error!(playlist = playlist_name, error = %e, "Error shuffling playlist");
                ShuffleOutcome::NetworkError(e.to_string())
            }
        }
    }

    async fn rebuild_and_play(&self, playlist_name: &str) -> Result<ShuffleOutcome, ServiceError> {
        let source = {
            let filtered = self.filtered_playlists.read().await;
            filtered.iter().find(|p| p.name == playlist_name).cloned()
        };
        let Some(source) = source else {
            tracing::info!(playlist = playlist_name, "No playlist found with that name");
            return Ok(ShuffleOutcome::NotFound);
        };
        tracing::debug!(playlist_id = %source.id, "Found playlist");

        let service = self.service.as_ref();
        let source_id = source.id.as_str();
        let entries = collect_pages(move |offset| service.playlist_items_page(source_id, offset)).await?;
        let total_entries = entries.len();

        let mut uris = filter_track_uris(entries);
        tracing::info!(
            playlist_id = %source.id,
            valid = uris.len(),
            skipped = total_entries - uris.len(),
            "Collected playlist tracks"
        );
        if uris.is_empty() {
            return Ok(ShuffleOutcome::NoValidTracks);
        }

        shuffle_uris(&mut uris, &mut *self.rng.lock().await);

        let target = self.clear_shuffle_playlist().await?;
        let failed_batches = self.append_in_batches(&target.id, &uris).await;

        tokio::time::sleep(self.pacing.settle_delay).await;

        let devices = self.service.devices().await?;
        let device = devices.into_iter().find_map(|d| {
            let id = d.id?;
            tracing::debug!(device = %d.name, active = d.is_active, "Selected playback device");
            Some((id, d.name))
        });

        match device {
            Some((device_id, device_name)) => {
                self.service.start_playback(&device_id, &target.uri).await?;
                Ok(ShuffleOutcome::Playing {
                    tracks: uris.len(),
                    failed_batches,
                    device: device_name,
                })
            }
            None => {
                tracing::info!("No active devices found, skipping playback");
                Ok(ShuffleOutcome::NoActiveDevice {
                    tracks: uris.len(),
                    failed_batches,
                })
            }
        }
    }

    /// Empty the shuffle playlist. A cached id the service no longer knows is
    /// re-resolved once before giving up.
    async fn clear_shuffle_playlist(&self) -> Result<PlaylistSummary, ServiceError> {
        let cached = self.shuffle_playlist().await;

        match self.service.replace_items(&cached.id, &[]).await {
            Ok(()) => Ok(cached),
            Err(ServiceError::NotFound(reason)) => {
                tracing::warn!(playlist_id = %cached.id, reason = %reason, "Shuffle playlist vanished, resolving it again");
                let playlists = fetch_all_playlists(self.service.as_ref()).await?;
                let refreshed = ensure_shuffle_playlist(self.service.as_ref(), &playlists).await?;
                *self.shuffle_playlist.write().await = refreshed.clone();

                self.service.replace_items(&refreshed.id, &[]).await?;
                Ok(refreshed)
            }
            Err(e) => Err(e),
        }
    }

    /// Append `uris` in paced batches. Returns how many batches failed.
    async fn append_in_batches(&self, playlist_id: &str, uris: &[String]) -> usize {
        let batch_size = self.pacing.batch_size.max(1);
        let total = uris.len().div_ceil(batch_size);
        let mut failed = 0;

        for (index, chunk) in uris.chunks(batch_size).enumerate() {
            if index > 0 {
                tokio::time::sleep(self.pacing.batch_delay).await;
            }

            if let Err(e) = self.service.add_items(playlist_id, chunk).await {
                tracing::warn!(batch = index + 1, total, error = %e, "Error adding batch, continuing");
                failed += 1;
            }
        }

        failed
    }
}

async fn fetch_all_playlists(service: &dyn MusicService) -> Result<Vec<PlaylistSummary>, ServiceError> {
    collect_pages(move |offset| service.playlists_page(offset)).await
}

async fn ensure_shuffle_playlist(
    service: &dyn MusicService,
    playlists: &[PlaylistSummary],
) -> Result<PlaylistSummary, ServiceError> {
    let mut matches = playlists.iter().filter(|p| p.name == SHUFFLE_PLAYLIST_NAME);

    if let Some(existing) = matches.next() {
        let duplicates = matches.count();
        if duplicates > 0 {
            tracing::warn!(duplicates, playlist_id = %existing.id, "Several shuffle playlists found, using the first");
        }
        return Ok(existing.clone());
    }

    let user_id = service.current_user_id().await?;
    let created = service.create_playlist(&user_id, SHUFFLE_PLAYLIST_NAME).await?;
    tracing::info!(playlist_id = %created.id, "Created shuffle playlist");
    Ok(created)
}
