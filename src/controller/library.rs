//! Playlist collection and selection

use super::AppController;

/// Page size of the single playlist request
pub const PLAYLIST_LIMIT: u32 = 50;

impl AppController {
    /// Fetch the user's playlists and replace the list. A failed fetch keeps
    /// whatever is already shown.
    pub async fn load_playlists(&self) {
        let store = &self.ctx.store;
        let Some(api) = Self::settle("load_playlists", self.ctx.clients.require().await) else {
            return;
        };

        // TODO: follow `next` pages once libraries above PLAYLIST_LIMIT need to be supported
        if let Some(playlists) = Self::settle("user_playlists", api.user_playlists(PLAYLIST_LIMIT).await) {
            tracing::info!(count = playlists.len(), "Playlists loaded");
            let last = playlists.len().saturating_sub(1);
            store.playlists.set(Some(playlists));
            store.playlist_cursor.update(|cursor| {
                if *cursor > last {
                    *cursor = last;
                    true
                } else {
                    false
                }
            });
        }
    }

    pub fn select_playlist(&self, playlist_id: &str) {
        tracing::info!(playlist_id, "Playlist picked");
        self.ctx.store.selected_playlist_id.set(Some(playlist_id.to_string()));
    }

    /// Select the playlist under the sidebar cursor
    pub fn select_highlighted(&self) {
        let store = &self.ctx.store;
        let cursor = store.playlist_cursor.get();
        let picked = store
            .playlists
            .get()
            .and_then(|playlists| playlists.get(cursor).map(|p| p.id.clone()));

        if let Some(playlist_id) = picked {
            self.select_playlist(&playlist_id);
        }
    }

    pub fn move_cursor_up(&self) {
        self.ctx.store.playlist_cursor.update(|cursor| {
            if *cursor > 0 {
                *cursor -= 1;
                true
            } else {
                false
            }
        });
    }

    pub fn move_cursor_down(&self) {
        let len = self.ctx.store.playlists.get().map_or(0, |p| p.len());
        self.ctx.store.playlist_cursor.update(|cursor| {
            if *cursor + 1 < len {
                *cursor += 1;
                true
            } else {
                false
            }
        });
    }
}
