//! Scripted in-memory `MusicService` for tests

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use super::service::{MusicService, ServiceError};
use super::types::{DeviceInfo, Page, PlaylistSummary};

/// A remote call observed by the fake
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    CurrentUser,
    PlaylistsPage { offset: u32 },
    CreatePlaylist { user_id: String, name: String },
    ItemsPage { playlist_id: String, offset: u32 },
    Replace { playlist_id: String, uris: Vec<String> },
    Add { playlist_id: String, uris: Vec<String> },
    Devices,
    StartPlayback { device_id: String, context_uri: String },
}

impl Call {
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Call::CreatePlaylist { .. }
                | Call::Replace { .. }
                | Call::Add { .. }
                | Call::StartPlayback { .. }
        )
    }
}

struct FakeState {
    user_id: String,
    playlists: Vec<PlaylistSummary>,
    items: HashMap<String, Vec<Option<String>>>,
    devices: Vec<DeviceInfo>,
    page_size: usize,
    failing_adds: HashSet<usize>,
    add_calls: usize,
    created: usize,
    calls: Vec<Call>,
}

pub struct FakeService {
    state: Mutex<FakeState>,
}

impl FakeService {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                user_id: "tester".to_string(),
                playlists: vec![],
                items: HashMap::new(),
                devices: vec![],
                page_size: 50,
                failing_adds: HashSet::new(),
                add_calls: 0,
                created: 0,
                calls: vec![],
            }),
        }
    }

    pub fn with_playlist(self, name: &str, uris: &[&str]) -> Self {
        let entries = uris.iter().map(|uri| Some(uri.to_string())).collect();
        self.with_raw_playlist(name, entries)
    }

    pub fn with_raw_playlist(self, name: &str, entries: Vec<Option<String>>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let id = format!("pl{}", state.playlists.len());
            state.playlists.push(PlaylistSummary {
                uri: format!("spotify:playlist:{id}"),
                id: id.clone(),
                name: name.to_string(),
            });
            state.items.insert(id, entries);
        }
        self
    }

    pub fn with_device(self, name: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let id = format!("device{}", state.devices.len());
            let is_active = state.devices.is_empty();
            state.devices.push(DeviceInfo {
                id: Some(id),
                name: name.to_string(),
                is_active,
            });
        }
        self
    }

    pub fn with_page_size(self, page_size: usize) -> Self {
        self.state.lock().unwrap().page_size = page_size;
        self
    }

    /// Make the `n`th add call (1-based) fail
    pub fn failing_add(self, n: usize) -> Self {
        self.state.lock().unwrap().failing_adds.insert(n);
        self
    }

    /// Unfollow a playlist behind the client's back
    pub fn remove_playlist(&self, name: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(pos) = state.playlists.iter().position(|p| p.name == name) {
            let removed = state.playlists.remove(pos);
            state.items.remove(&removed.id);
        }
    }

    pub fn playlist_named(&self, name: &str) -> Option<PlaylistSummary> {
        let state = self.state.lock().unwrap();
        state.playlists.iter().find(|p| p.name == name).cloned()
    }

    /// Current track URIs of a playlist
    pub fn contents(&self, playlist_id: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .items
            .get(playlist_id)
            .map(|items| items.iter().flatten().cloned().collect())
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn page<T: Clone>(items: &[T], offset: u32, page_size: usize) -> Page<T> {
        let start = (offset as usize).min(items.len());
        let end = (start + page_size).min(items.len());
        let next_offset = (end < items.len()).then_some(end as u32);
        Page {
            items: items[start..end].to_vec(),
            next_offset,
        }
    }
}

#[async_trait]
impl MusicService for FakeService {
    async fn current_user_id(&self) -> Result<String, ServiceError> {
        tokio::task::yield_now().await;
        self.record(Call::CurrentUser);
        Ok(self.state.lock().unwrap().user_id.clone())
    }

    async fn playlists_page(&self, offset: u32) -> Result<Page<PlaylistSummary>, ServiceError> {
        tokio::task::yield_now().await;
        self.record(Call::PlaylistsPage { offset });
        let state = self.state.lock().unwrap();
        Ok(Self::page(&state.playlists, offset, state.page_size))
    }

    async fn create_playlist(&self, user_id: &str, name: &str) -> Result<PlaylistSummary, ServiceError> {
        tokio::task::yield_now().await;
        self.record(Call::CreatePlaylist {
            user_id: user_id.to_string(),
            name: name.to_string(),
        });
        let mut state = self.state.lock().unwrap();
        state.created += 1;
        let id = format!("created{}", state.created);
        let playlist = PlaylistSummary {
            uri: format!("spotify:playlist:{id}"),
            id: id.clone(),
            name: name.to_string(),
        };
        state.playlists.push(playlist.clone());
        state.items.insert(id, vec![]);
        Ok(playlist)
    }

    async fn playlist_items_page(
        &self,
        playlist_id: &str,
        offset: u32,
    ) -> Result<Page<Option<String>>, ServiceError> {
        tokio::task::yield_now().await;
        self.record(Call::ItemsPage {
            playlist_id: playlist_id.to_string(),
            offset,
        });
        let state = self.state.lock().unwrap();
        let items = state
            .items
            .get(playlist_id)
            .ok_or_else(|| ServiceError::NotFound(playlist_id.to_string()))?;
        Ok(Self::page(items, offset, state.page_size))
    }

    async fn replace_items(&self, playlist_id: &str, uris: &[String]) -> Result<(), ServiceError> {
        tokio::task::yield_now().await;
        self.record(Call::Replace {
            playlist_id: playlist_id.to_string(),
            uris: uris.to_vec(),
        });
        let mut state = self.state.lock().unwrap();
        let items = state
            .items
            .get_mut(playlist_id)
            .ok_or_else(|| ServiceError::NotFound(playlist_id.to_string()))?;
        *items = uris.iter().cloned().map(Some).collect();
        Ok(())
    }

    async fn add_items(&self, playlist_id: &str, uris: &[String]) -> Result<(), ServiceError> {
        tokio::task::yield_now().await;
        self.record(Call::Add {
            playlist_id: playlist_id.to_string(),
            uris: uris.to_vec(),
        });
        let mut state = self.state.lock().unwrap();
        state.add_calls += 1;
        if state.failing_adds.contains(&state.add_calls) {
            return Err(ServiceError::Api("429 Too Many Requests".to_string()));
        }
        let items = state
            .items
            .get_mut(playlist_id)
            .ok_or_else(|| ServiceError::NotFound(playlist_id.to_string()))?;
        items.extend(uris.iter().cloned().map(Some));
        Ok(())
    }

    async fn devices(&self) -> Result<Vec<DeviceInfo>, ServiceError> {
        tokio::task::yield_now().await;
        self.record(Call::Devices);
        Ok(self.state.lock().unwrap().devices.clone())
    }

    async fn start_playback(&self, device_id: &str, context_uri: &str) -> Result<(), ServiceError> {
        tokio::task::yield_now().await;
        self.record(Call::StartPlayback {
            device_id: device_id.to_string(),
            context_uri: context_uri.to_string(),
        });
        Ok(())
    }
}
