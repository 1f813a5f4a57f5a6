//! Test doubles for the remote API

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::controller::{AppContext, AppController};
use crate::model::{
    Album, ApiError, ApiResult, Artist, ClientFactory, Image, PlaybackReport, Playlist,
    RemoteApi, Store, TrackMetadata,
};

/// One recorded remote call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    CurrentPlayingTrack,
    CurrentPlaybackState,
    Play,
    Pause,
    SkipToNext,
    SkipToPrevious,
    SetVolume(u8),
    UserPlaylists(u32),
    Track(String),
}

/// Canned responses plus switches that make every command or read fail
pub struct Responses {
    pub playing_track: Option<TrackMetadata>,
    pub playback: Option<PlaybackReport>,
    pub playlists: Vec<Playlist>,
    pub tracks: Vec<TrackMetadata>,
    pub reject_commands: bool,
    pub reject_reads: bool,
}

impl Default for Responses {
    fn default() -> Self {
        Self {
            playing_track: None,
            playback: None,
            playlists: Vec::new(),
            tracks: Vec::new(),
            reject_commands: false,
            reject_reads: false,
        }
    }
}

pub struct MockApi {
    calls: Mutex<Vec<Call>>,
    pub responses: Mutex<Responses>,
}

impl MockApi {
    pub fn new(responses: Responses) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            responses: Mutex::new(responses),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn command(&self, call: Call) -> ApiResult<()> {
        self.record(call);
        if self.responses.lock().unwrap().reject_commands {
            Err(ApiError::Forbidden("Player command failed: Premium required".into()))
        } else {
            Ok(())
        }
    }

    fn read<T>(&self, call: Call, f: impl FnOnce(&Responses) -> T) -> ApiResult<T> {
        self.record(call);
        let responses = self.responses.lock().unwrap();
        if responses.reject_reads {
            Err(ApiError::Remote("connection reset".into()))
        } else {
            Ok(f(&responses))
        }
    }
}

#[async_trait]
impl RemoteApi for MockApi {
    async fn current_playing_track(&self) -> ApiResult<Option<TrackMetadata>> {
        self.read(Call::CurrentPlayingTrack, |r| r.playing_track.clone())
    }

    async fn current_playback_state(&self) -> ApiResult<Option<PlaybackReport>> {
        self.read(Call::CurrentPlaybackState, |r| r.playback)
    }

    async fn play(&self) -> ApiResult<()> {
        self.command(Call::Play)
    }

    async fn pause(&self) -> ApiResult<()> {
        self.command(Call::Pause)
    }

    async fn skip_to_next(&self) -> ApiResult<()> {
        self.command(Call::SkipToNext)
    }

    async fn skip_to_previous(&self) -> ApiResult<()> {
        self.command(Call::SkipToPrevious)
    }

    async fn set_volume(&self, percent: u8) -> ApiResult<()> {
        self.command(Call::SetVolume(percent))
    }

    async fn user_playlists(&self, limit: u32) -> ApiResult<Vec<Playlist>> {
        self.read(Call::UserPlaylists(limit), |r| r.playlists.clone())
    }

    async fn track(&self, id: &str) -> ApiResult<TrackMetadata> {
        let found = self.read(Call::Track(id.to_string()), |r| {
            r.tracks.iter().find(|t| t.id == id).cloned()
        })?;
        found.ok_or_else(|| ApiError::Remote(format!("404 track {id}")))
    }
}

/// Factory whose readiness can be flipped from a test
pub struct MockFactory {
    api: Arc<MockApi>,
    ready: Mutex<bool>,
}

impl MockFactory {
    pub fn new(api: Arc<MockApi>, ready: bool) -> Arc<Self> {
        Arc::new(Self {
            api,
            ready: Mutex::new(ready),
        })
    }

    pub fn set_ready(&self, ready: bool) {
        *self.ready.lock().unwrap() = ready;
    }
}

#[async_trait]
impl ClientFactory for MockFactory {
    async fn client(&self) -> Option<Arc<dyn RemoteApi>> {
        if *self.ready.lock().unwrap() {
            let api: Arc<dyn RemoteApi> = self.api.clone();
            Some(api)
        } else {
            None
        }
    }
}

pub fn track(id: &str) -> TrackMetadata {
    TrackMetadata {
        id: id.to_string(),
        name: format!("Song {id}"),
        artists: vec![Artist {
            name: format!("Artist {id}"),
        }],
        album: Album {
            name: format!("Album {id}"),
            images: vec![Image {
                url: format!("https://i.scdn.co/image/{id}"),
            }],
        },
    }
}

pub fn playlist(id: &str, name: &str) -> Playlist {
    Playlist {
        id: id.to_string(),
        name: name.to_string(),
        raw: serde_json::json!({ "id": id, "name": name, "collaborative": false }),
    }
}

/// A controller wired to a mock API, ready or not
pub fn controller(responses: Responses, ready: bool) -> (AppController, Arc<MockApi>, Arc<MockFactory>) {
    let api = MockApi::new(responses);
    let factory = MockFactory::new(api.clone(), ready);
    let context = AppContext::new(Arc::new(Store::new()), factory.clone());
    (AppController::new(context), api, factory)
}
