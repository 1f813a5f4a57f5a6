//! Model module - Application state and data types
//!
//! - `types`: Track, playlist and snapshot types
//! - `store`: Observable cells shared by every component
//! - `error`: Remote call failures
//! - `spotify_client`: Remote API trait, rspotify implementation and client factory

mod types;
mod store;
mod error;
mod spotify_client;

pub use types::{LibrarySnapshot, PlaybackSnapshot};
#[cfg(test)]
pub use types::{Album, Artist, Image, PlaybackReport, Playlist, TrackMetadata};

pub use store::{StateCell, Store, DEFAULT_VOLUME};

pub use error::{ApiError, ApiResult};

pub use spotify_client::{ClientFactory, SpotifyClientFactory};
#[cfg(test)]
pub use spotify_client::RemoteApi;
