//! Spotify Web API surface and the factory that binds it to a credential

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use rspotify::{
    AuthCodeSpotify, Config, Token,
    model::{PlayableItem, TrackId},
    prelude::*,
};
use tokio::sync::Mutex;

use crate::auth::{SCOPES, Session, SessionAccessor};
use super::error::{ApiError, ApiResult};
use super::types::{PlaybackReport, Playlist, TrackMetadata};

/// The remote calls the player relies on.
///
/// Commands carry no body and target whichever device is active on the
/// account. Reads return `None` when the service has nothing to report
/// (no active device, nothing playing).
#[async_trait]
pub trait RemoteApi: Send + Sync {
    async fn current_playing_track(&self) -> ApiResult<Option<TrackMetadata>>;
    async fn current_playback_state(&self) -> ApiResult<Option<PlaybackReport>>;
    async fn play(&self) -> ApiResult<()>;
    async fn pause(&self) -> ApiResult<()>;
    async fn skip_to_next(&self) -> ApiResult<()>;
    async fn skip_to_previous(&self) -> ApiResult<()>;
    async fn set_volume(&self, percent: u8) -> ApiResult<()>;
    async fn user_playlists(&self, limit: u32) -> ApiResult<Vec<Playlist>>;
    async fn track(&self, id: &str) -> ApiResult<TrackMetadata>;
}

/// Hands out a client bound to the current bearer credential.
///
/// `None` means "not ready": callers skip the call instead of failing.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    async fn client(&self) -> Option<Arc<dyn RemoteApi>>;

    /// Same as [`client`](Self::client) but as an error, for `?` chains
    async fn require(&self) -> ApiResult<Arc<dyn RemoteApi>> {
        self.client().await.ok_or(ApiError::NotReady)
    }
}

/// [`RemoteApi`] over rspotify
#[derive(Clone)]
pub struct SpotifyClient {
    client: Arc<AuthCodeSpotify>,
}

impl SpotifyClient {
    /// Build a client that sends `session`'s access token.
    /// Refreshing is left to the session provider.
    pub async fn with_session(session: &Session) -> ApiResult<Self> {
        let spotify = AuthCodeSpotify::with_config(
            Default::default(),
            Default::default(),
            Config {
                token_cached: false,
                token_refreshing: false,
                ..Default::default()
            },
        );

        let token = Token {
            access_token: session.access_token.clone(),
            expires_in: session.expires_at - chrono::Utc::now(),
            expires_at: Some(session.expires_at),
            scopes: SCOPES
                .split_whitespace()
                .map(|s| s.to_string())
                .collect::<HashSet<String>>(),
            refresh_token: None,
        };

        match spotify.token.lock().await {
            Ok(mut guard) => *guard = Some(token),
            Err(_) => return Err(ApiError::Remote("token slot poisoned".to_string())),
        }
        tracing::debug!("rspotify client bound to current credential");

        Ok(Self {
            client: Arc::new(spotify),
        })
    }
}

#[async_trait]
impl RemoteApi for SpotifyClient {
    async fn current_playing_track(&self) -> ApiResult<Option<TrackMetadata>> {
        crate::log_api_request!("current_playing_track", scope = "player");
        let result = self.client.current_playing(None, None::<Vec<_>>).await;
        crate::log_api_result!("current_playing_track", result);

        let track = result?.and_then(|context| match context.item {
            Some(PlayableItem::Track(track)) => Some(TrackMetadata::from_full_track(&track)),
            // Episodes and unknown items have no track id to mirror
            _ => None,
        });
        Ok(track)
    }

    async fn current_playback_state(&self) -> ApiResult<Option<PlaybackReport>> {
        tracing::trace!("Fetching current playback state");
        let result = self.client.current_playback(None, None::<Vec<_>>).await;
        crate::log_api_result!("current_playback_state", result);

        let report = result?.map(|playback| {
            tracing::trace!(
                is_playing = playback.is_playing,
                device = ?playback.device.name,
                "Got playback state"
            );
            PlaybackReport {
                is_playing: playback.is_playing,
            }
        });
        Ok(report)
    }

    async fn play(&self) -> ApiResult<()> {
        tracing::debug!("API: resume_playback");
        self.client.resume_playback(None, None).await?;
        Ok(())
    }

    async fn pause(&self) -> ApiResult<()> {
        tracing::debug!("API: pause_playback");
        self.client.pause_playback(None).await?;
        Ok(())
    }

    async fn skip_to_next(&self) -> ApiResult<()> {
        tracing::debug!("API: next_track");
        self.client.next_track(None).await?;
        Ok(())
    }

    async fn skip_to_previous(&self) -> ApiResult<()> {
        tracing::debug!("API: previous_track");
        self.client.previous_track(None).await?;
        Ok(())
    }

    async fn set_volume(&self, percent: u8) -> ApiResult<()> {
        tracing::debug!(percent, "API: set_volume");
        self.client.volume(percent, None).await?;
        Ok(())
    }

    async fn user_playlists(&self, limit: u32) -> ApiResult<Vec<Playlist>> {
        crate::log_api_request!("user_playlists", limit);
        // One page only; a library larger than `limit` is cut off
        let result = self.client.current_user_playlists_manual(Some(limit), None).await;
        crate::log_api_result!("user_playlists", result);

        let page = result?;
        tracing::debug!(
            returned = page.items.len(),
            total = page.total,
            "Fetched playlist page"
        );
        Ok(page.items.iter().map(Playlist::from_simplified).collect())
    }

    async fn track(&self, id: &str) -> ApiResult<TrackMetadata> {
        crate::log_api_request!("track", track_id = id);
        let track_id = TrackId::from_id(id)?;
        let result = self.client.track(track_id, None).await;
        crate::log_api_result!("track", result);

        Ok(TrackMetadata::from_full_track(&result?))
    }
}

/// Builds [`SpotifyClient`]s from the live session, rebuilding only when the
/// access token changes.
pub struct SpotifyClientFactory {
    session: SessionAccessor,
    bound: Mutex<Option<(String, Arc<dyn RemoteApi>)>>,
}

impl SpotifyClientFactory {
    pub fn new(session: SessionAccessor) -> Self {
        Self {
            session,
            bound: Mutex::new(None),
        }
    }
}

#[async_trait]
impl ClientFactory for SpotifyClientFactory {
    async fn client(&self) -> Option<Arc<dyn RemoteApi>> {
        let bearer = self.session.bearer()?;

        let mut bound = self.bound.lock().await;
        if let Some((token, client)) = bound.as_ref() {
            if *token == bearer {
                return Some(client.clone());
            }
        }

        let session = self.session.usable_session()?;

        match SpotifyClient::with_session(&session).await {
            Ok(client) => {
                let client: Arc<dyn RemoteApi> = Arc::new(client);
                *bound = Some((session.access_token.clone(), client.clone()));
                Some(client)
            }
            Err(e) => {
                tracing::error!(error = %e, "Could not bind client to credential");
                None
            }
        }
    }
}
