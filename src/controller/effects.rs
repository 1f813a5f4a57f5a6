//! Watchers that re-run mount logic
//!
//! Nothing here polls on a timer. The mirror is only refreshed when the
//! session changes, when the current track id changes, or at start-up.

use std::sync::atomic::Ordering;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::model::DEFAULT_VOLUME;
use super::AppController;

impl AppController {
    /// Player mount: with a credential and no known track, poll the server
    /// and reset the volume to its default. The default goes out on the
    /// first mount and afterwards only when the volume had moved away from it.
    pub async fn mount_player(&self) {
        if self.ctx.clients.client().await.is_none() {
            tracing::trace!("Player mount skipped, not ready");
            return;
        }
        if self.ctx.store.current_track_id.get().is_some() {
            return;
        }

        tracing::debug!("Player mount: polling current song");
        self.load_current_song().await;

        let moved = self.ctx.store.volume.set(DEFAULT_VOLUME);
        let first = !self.volume_announced.swap(true, Ordering::SeqCst);
        if moved || first {
            self.dispatch_volume(DEFAULT_VOLUME);
        }
    }

    /// Run [`mount_player`](Self::mount_player) now and again after every
    /// session or track id change.
    pub async fn run_player_effect<S>(&self, mut session: watch::Receiver<S>) {
        let mut track_ids = self.ctx.store.current_track_id.subscribe();
        loop {
            session.mark_unchanged();
            track_ids.mark_unchanged();
            self.mount_player().await;

            tokio::select! {
                changed = session.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                changed = track_ids.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
    }

    /// Run [`load_playlists`](Self::load_playlists) now and after every session change
    pub async fn run_library_effect<S>(&self, mut session: watch::Receiver<S>) {
        loop {
            session.mark_unchanged();
            self.load_playlists().await;
            if session.changed().await.is_err() {
                break;
            }
        }
    }

    /// Start every watcher. In-flight requests are never cancelled; aborting
    /// a handle only stops future re-runs.
    pub fn spawn_effects<S>(&self, session: watch::Receiver<S>) -> Vec<JoinHandle<()>>
    where
        S: Send + Sync + 'static,
    {
        let player = self.clone();
        let player_session = session.clone();
        let library = self.clone();
        let resolver = self.clone();

        vec![
            tokio::spawn(async move { player.run_player_effect(player_session).await }),
            tokio::spawn(async move { library.run_library_effect(session).await }),
            tokio::spawn(async move { resolver.watch_current_track().await }),
        ]
    }
}
