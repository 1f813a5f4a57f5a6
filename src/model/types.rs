//! Core type definitions for the application

use rspotify::model::{FullTrack, SimplifiedPlaylist};
use rspotify::prelude::Id;

/// An artist credited on a track
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artist {
    pub name: String,
}

/// One artwork rendition of an album
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pub url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Album {
    pub name: String,
    pub images: Vec<Image>,
}

/// Descriptive metadata for a track, resolved lazily from its id
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackMetadata {
    pub id: String,
    pub name: String,
    pub artists: Vec<Artist>,
    pub album: Album,
}

impl TrackMetadata {
    pub fn from_full_track(track: &FullTrack) -> Self {
        Self {
            id: track.id.as_ref().map(|id| id.id().to_string()).unwrap_or_default(),
            name: track.name.clone(),
            artists: track
                .artists
                .iter()
                .map(|a| Artist { name: a.name.clone() })
                .collect(),
            album: Album {
                name: track.album.name.clone(),
                images: track
                    .album
                    .images
                    .iter()
                    .map(|i| Image { url: i.url.clone() })
                    .collect(),
            },
        }
    }

    /// First credited artist, the one the player bar shows
    pub fn primary_artist(&self) -> Option<&str> {
        self.artists.first().map(|a| a.name.as_str())
    }

    /// Largest artwork; the service lists images widest first
    pub fn artwork_url(&self) -> Option<&str> {
        self.album.images.first().map(|i| i.url.as_str())
    }
}

/// What the service says about the current playback context
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackReport {
    pub is_playing: bool,
}

/// A user's playlist.
///
/// Only `id` and `name` are looked at. `raw` is the record exactly as the
/// service returned it.
#[derive(Clone, Debug, PartialEq)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub raw: serde_json::Value,
}

impl Playlist {
    pub fn from_simplified(playlist: &SimplifiedPlaylist) -> Self {
        Self {
            id: playlist.id.id().to_string(),
            name: playlist.name.clone(),
            raw: serde_json::to_value(playlist).unwrap_or(serde_json::Value::Null),
        }
    }
}

/// Everything the view needs for one frame
#[derive(Clone, Debug, Default)]
pub struct PlaybackSnapshot {
    pub current_track_id: Option<String>,
    pub is_playing: bool,
    pub volume: u8,
    pub track: Option<TrackMetadata>,
}

/// Sidebar contents for one frame
#[derive(Clone, Debug, Default)]
pub struct LibrarySnapshot {
    pub playlists: Option<Vec<Playlist>>,
    pub cursor: usize,
    pub selected_playlist_id: Option<String>,
}
