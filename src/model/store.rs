//! Shared state store built from observable cells
//!
//! Every piece of state that more than one component touches lives in a
//! [`StateCell`]. Writers replace the value and subscribers are woken right
//! away; readers either take a clone or hold a `watch::Receiver` and wait for
//! changes. There are no multi-cell transactions, so reading two cells back
//! to back can observe one writer's update without the other's.

use tokio::sync::watch;

use super::types::{LibrarySnapshot, PlaybackSnapshot, Playlist, TrackMetadata};

/// Volume the player starts at and resets to on mount
pub const DEFAULT_VOLUME: u8 = 50;

/// A single observable value
#[derive(Debug)]
pub struct StateCell<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone + PartialEq> StateCell<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Write a new value. Subscribers are only notified when it differs from
    /// the current one. Returns whether the value changed.
    pub fn set(&self, value: T) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        })
    }

    /// Modify the value in place; `f` returns whether it changed anything
    pub fn update(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone + PartialEq + Default> Default for StateCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// All shared cells of the application.
///
/// Created once in `main` and handed to components through
/// [`AppContext`](crate::controller::AppContext).
#[derive(Debug)]
pub struct Store {
    pub current_track_id: StateCell<Option<String>>,
    pub is_playing: StateCell<bool>,
    pub volume: StateCell<u8>,
    pub track_metadata: StateCell<Option<TrackMetadata>>,
    pub selected_playlist_id: StateCell<Option<String>>,
    /// `None` until the first successful fetch
    pub playlists: StateCell<Option<Vec<Playlist>>>,
    pub playlist_cursor: StateCell<usize>,
    pub should_quit: StateCell<bool>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            current_track_id: StateCell::default(),
            is_playing: StateCell::default(),
            volume: StateCell::new(DEFAULT_VOLUME),
            track_metadata: StateCell::default(),
            selected_playlist_id: StateCell::default(),
            playlists: StateCell::default(),
            playlist_cursor: StateCell::default(),
            should_quit: StateCell::default(),
        }
    }

    pub fn playback_snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_track_id: self.current_track_id.get(),
            is_playing: self.is_playing.get(),
            volume: self.volume.get(),
            track: self.track_metadata.get(),
        }
    }

    pub fn library_snapshot(&self) -> LibrarySnapshot {
        LibrarySnapshot {
            playlists: self.playlists.get(),
            cursor: self.playlist_cursor.get(),
            selected_playlist_id: self.selected_playlist_id.get(),
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
