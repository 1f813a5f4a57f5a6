//! Track metadata resolution for the current track id

use super::AppController;

impl AppController {
    /// Fetch metadata for `track_id` unless it is already resolved.
    ///
    /// The result is dropped if the current track moved on while the request
    /// was in flight.
    pub async fn resolve_track(&self, track_id: &str) {
        let store = &self.ctx.store;
        if store
            .track_metadata
            .get()
            .is_some_and(|resolved| resolved.id == track_id)
        {
            return;
        }

        let Some(api) = Self::settle("resolve_track", self.ctx.clients.require().await) else {
            return;
        };
        let Some(track) = Self::settle("track", api.track(track_id).await) else {
            return;
        };

        if store.current_track_id.get().as_deref() != Some(track_id) {
            tracing::debug!(track_id, "Current track changed during fetch, dropping metadata");
            return;
        }

        tracing::info!(
            track_id,
            name = %track.name,
            artist = track.primary_artist().unwrap_or_default(),
            "Track metadata resolved"
        );
        store.track_metadata.set(Some(track));
    }

    /// Re-run the resolver whenever `current_track_id` changes, starting with
    /// its current value. Runs until the store goes away.
    pub async fn watch_current_track(&self) {
        let mut track_ids = self.ctx.store.current_track_id.subscribe();
        loop {
            let current = track_ids.borrow_and_update().clone();
            if let Some(track_id) = current {
                self.resolve_track(&track_id).await;
            }
            if track_ids.changed().await.is_err() {
                break;
            }
        }
    }
}
