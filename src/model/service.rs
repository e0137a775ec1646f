//! Remote music service port and its rspotify implementation
//!
//! `SpotifyClient` only talks to the remote API through [`MusicService`], so the
//! authenticated session is an explicit object that tests replace with an
//! in-memory fake.

use std::sync::Arc;

use async_trait::async_trait;
use rspotify::{
    http::HttpError,
    model::{IdError, PlayContextId, PlayableId, PlayableItem, PlaylistId, TrackId, UserId},
    prelude::*,
    AuthCodeSpotify, ClientError,
};
use thiserror::Error;

use super::types::{DeviceInfo, Page, PlaylistSummary};
use crate::{log_api_request, log_api_result};

const PLAYLIST_PAGE_LIMIT: u32 = 50;
const TRACK_PAGE_LIMIT: u32 = 100;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The remote service answered 404 for the addressed resource
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Spotify API error: {0}")]
    Api(String),
    #[error("Invalid Spotify id: {0}")]
    InvalidId(String),
}

impl From<ClientError> for ServiceError {
    fn from(err: ClientError) -> Self {
        if let ClientError::Http(http) = &err {
            if let HttpError::StatusCode(response) = http.as_ref() {
                if response.status().as_u16() == 404 {
                    return ServiceError::NotFound(err.to_string());
                }
            }
        }
        ServiceError::Api(err.to_string())
    }
}

impl From<IdError> for ServiceError {
    fn from(err: IdError) -> Self {
        ServiceError::InvalidId(err.to_string())
    }
}

/// The slice of the remote API the shuffler consumes
#[async_trait]
pub trait MusicService: Send + Sync {
    async fn current_user_id(&self) -> Result<String, ServiceError>;

    /// One page of the current user's playlists starting at `offset`
    async fn playlists_page(&self, offset: u32) -> Result<Page<PlaylistSummary>, ServiceError>;

    async fn create_playlist(&self, user_id: &str, name: &str) -> Result<PlaylistSummary, ServiceError>;

    /// One page of a playlist's item URIs. `None` marks an item without a
    /// playable URI (local file, removed track).
    async fn playlist_items_page(
        &self,
        playlist_id: &str,
        offset: u32,
    ) -> Result<Page<Option<String>>, ServiceError>;

    async fn replace_items(&self, playlist_id: &str, uris: &[String]) -> Result<(), ServiceError>;

    async fn add_items(&self, playlist_id: &str, uris: &[String]) -> Result<(), ServiceError>;

    async fn devices(&self) -> Result<Vec<DeviceInfo>, ServiceError>;

    async fn start_playback(&self, device_id: &str, context_uri: &str) -> Result<(), ServiceError>;
}

/// [`MusicService`] backed by an authorized rspotify session
#[derive(Clone)]
pub struct RspotifyService {
    client: Arc<AuthCodeSpotify>,
}

impl RspotifyService {
    pub fn new(client: AuthCodeSpotify) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

/// Offset of the page after one starting at `offset`, if the listing has more
fn next_page_offset(offset: u32, limit: u32, has_next: bool) -> Option<u32> {
    has_next.then(|| offset + limit)
}

fn playable_ids(uris: &[String]) -> Result<Vec<PlayableId<'_>>, IdError> {
    uris.iter()
        .map(|uri| TrackId::from_uri(uri).map(PlayableId::Track))
        .collect()
}

#[async_trait]
impl MusicService for RspotifyService {
    async fn current_user_id(&self) -> Result<String, ServiceError> {
        let user = self.client.me().await?;
        tracing::debug!(user_id = %user.id, "Resolved current user");
        Ok(user.id.id().to_string())
    }

    async fn playlists_page(&self, offset: u32) -> Result<Page<PlaylistSummary>, ServiceError> {
        log_api_request!("current_user_playlists", offset);
        let page = self
            .client
            .current_user_playlists_manual(Some(PLAYLIST_PAGE_LIMIT), Some(offset))
            .await?;

        let next_offset = next_page_offset(page.offset, page.limit, page.next.is_some());
        let items = page
            .items
            .into_iter()
            .map(|playlist| PlaylistSummary {
                id: playlist.id.id().to_string(),
                uri: playlist.id.uri(),
                name: playlist.name,
            })
            .collect();

        Ok(Page { items, next_offset })
    }

    async fn create_playlist(&self, user_id: &str, name: &str) -> Result<PlaylistSummary, ServiceError> {
        log_api_request!("user_playlist_create", user_id, name);
        let user = UserId::from_id(user_id)?;
        let playlist = self
            .client
            .user_playlist_create(user, name, Some(false), None, None)
            .await?;

        Ok(PlaylistSummary {
            id: playlist.id.id().to_string(),
            uri: playlist.id.uri(),
            name: playlist.name,
        })
    }

    async fn playlist_items_page(
        &self,
        playlist_id: &str,
        offset: u32,
    ) -> Result<Page<Option<String>>, ServiceError> {
        log_api_request!("playlist_items", playlist_id, offset);
        let id = PlaylistId::from_id(playlist_id)?;
        let page = self
            .client
            .playlist_items_manual(id, None, None, Some(TRACK_PAGE_LIMIT), Some(offset))
            .await?;

        let next_offset = next_page_offset(page.offset, page.limit, page.next.is_some());
        let items = page
            .items
            .into_iter()
            .map(|item| match item.track {
                Some(PlayableItem::Track(track)) => track.id.map(|id| id.uri()),
                Some(PlayableItem::Episode(episode)) => Some(episode.id.uri()),
                _ => None,
            })
            .collect();

        Ok(Page { items, next_offset })
    }

    async fn replace_items(&self, playlist_id: &str, uris: &[String]) -> Result<(), ServiceError> {
        log_api_request!("playlist_replace_items", playlist_id, count = uris.len());
        let id = PlaylistId::from_id(playlist_id)?;
        let items = playable_ids(uris)?;
        let result = self.client.playlist_replace_items(id, items).await;
        log_api_result!("playlist_replace_items", result);
        Ok(result?)
    }

    async fn add_items(&self, playlist_id: &str, uris: &[String]) -> Result<(), ServiceError> {
        log_api_request!("playlist_add_items", playlist_id, count = uris.len());
        let id = PlaylistId::from_id(playlist_id)?;
        let items = playable_ids(uris)?;
        let result = self.client.playlist_add_items(id, items, None).await;
        log_api_result!("playlist_add_items", result);
        result?;
        Ok(())
    }

    async fn devices(&self) -> Result<Vec<DeviceInfo>, ServiceError> {
        let devices = self.client.device().await?;
        let device_infos: Vec<DeviceInfo> = devices
            .into_iter()
            .map(|d| DeviceInfo {
                id: d.id,
                name: d.name,
                is_active: d.is_active,
            })
            .collect();
        tracing::debug!(count = device_infos.len(), "Found devices");
        Ok(device_infos)
    }

    async fn start_playback(&self, device_id: &str, context_uri: &str) -> Result<(), ServiceError> {
        log_api_request!("start_context_playback", device_id, context_uri);
        let context = PlayContextId::Playlist(PlaylistId::from_uri(context_uri)?);
        let result = self
            .client
            .start_context_playback(context, Some(device_id), None, None)
            .await;
        log_api_result!("start_context_playback", result);
        Ok(result?)
    }
}
