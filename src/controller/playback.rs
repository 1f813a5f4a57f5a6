//! Playback control methods

use std::time::Duration;

use super::AppController;

/// Quiet period before a volume change is sent
pub const VOLUME_DEBOUNCE: Duration = Duration::from_millis(500);
/// Increment of the volume step controls
pub const VOLUME_STEP: u8 = 10;

impl AppController {
    /// Mirror the server's current track and playing flag.
    ///
    /// Only runs while no metadata is resolved. Once some track is resolved
    /// this does nothing, even if the server has moved on to another track.
    pub async fn load_current_song(&self) {
        let store = &self.ctx.store;
        if store.track_metadata.get().is_some() {
            tracing::trace!("Track metadata present, not polling");
            return;
        }

        let Some(api) = Self::settle("load_current_song", self.ctx.clients.require().await) else {
            return;
        };

        let Some(playing) = Self::settle("current_playing_track", api.current_playing_track().await)
        else {
            return;
        };
        let track_id = playing.map(|track| track.id);
        tracing::debug!(track_id = ?track_id, "Mirroring current track");
        store.current_track_id.set(track_id);

        if let Some(report) =
            Self::settle("current_playback_state", api.current_playback_state().await)
        {
            let is_playing = report.is_some_and(|r| r.is_playing);
            tracing::debug!(is_playing, "Mirroring playback state");
            store.is_playing.set(is_playing);
        }
    }

    /// Ask the server whether it is playing, send the opposite command and
    /// flip the local flag without waiting to see whether it took.
    pub async fn toggle_play_pause(&self) {
        let Some(api) = Self::settle("toggle_play_pause", self.ctx.clients.require().await) else {
            return;
        };

        let Some(report) =
            Self::settle("current_playback_state", api.current_playback_state().await)
        else {
            return;
        };
        // No playback context at all counts as paused
        let server_playing = report.is_some_and(|r| r.is_playing);
        tracing::debug!(server_playing, "Toggling playback");

        if server_playing {
            Self::settle("pause", api.pause().await);
        } else {
            Self::settle("play", api.play().await);
        }

        self.ctx.store.is_playing.set(!server_playing);
        tracing::info!(action = if server_playing { "paused" } else { "resumed" }, "Playback toggled");
    }

    pub async fn skip_next(&self) {
        tracing::debug!("Skipping to next track");
        let result = match self.ctx.clients.require().await {
            Ok(api) => api.skip_to_next().await,
            Err(e) => Err(e),
        };
        if Self::settle("skip_to_next", result).is_some() {
            tracing::info!("Skipped to next track");
        }
    }

    pub async fn skip_previous(&self) {
        tracing::debug!("Skipping to previous track");
        let result = match self.ctx.clients.require().await {
            Ok(api) => api.skip_to_previous().await,
            Err(e) => Err(e),
        };
        if Self::settle("skip_to_previous", result).is_some() {
            tracing::info!("Skipped to previous track");
        }
    }

    /// Record a new volume and queue it for the remote side. Writing the
    /// value already held sends nothing.
    pub fn set_volume(&self, volume: u8) {
        let volume = volume.min(100);
        if self.ctx.store.volume.set(volume) {
            self.dispatch_volume(volume);
        }
    }

    /// Queue `volume` for the debounced remote call. 0 and 100 are never sent.
    // TODO: confirm with product whether the 0/100 suppression is wanted; muting from here is impossible
    pub(crate) fn dispatch_volume(&self, volume: u8) {
        if volume > 0 && volume < 100 {
            self.volume_dispatch.submit(volume);
        } else {
            tracing::debug!(volume, "Edge volume kept local");
        }
    }

    pub fn volume_down(&self) {
        let current = self.ctx.store.volume.get();
        if current > 0 {
            self.set_volume(current.saturating_sub(VOLUME_STEP));
        }
    }

    pub fn volume_up(&self) {
        let current = self.ctx.store.volume.get();
        if current < 100 {
            self.set_volume(current.saturating_add(VOLUME_STEP).min(100));
        }
    }

    /// Fine adjustment, the keyboard stand-in for dragging a slider
    pub fn nudge_volume(&self, delta: i8) {
        let current = self.ctx.store.volume.get() as i16;
        let target = (current + delta as i16).clamp(0, 100) as u8;
        self.set_volume(target);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use crate::model::PlaybackReport;
    use crate::testing::{self, Call, Responses};

    fn playing(is_playing: bool) -> Option<PlaybackReport> {
        Some(PlaybackReport { is_playing })
    }

    async fn settle_debounce() {
        tokio::time::sleep(super::VOLUME_DEBOUNCE + Duration::from_millis(100)).await;
    }

    #[tokio::test]
    async fn load_current_song_mirrors_track_and_flag() {
        let (controller, api, _) = testing::controller(
            Responses {
                playing_track: Some(testing::track("abc123")),
                playback: playing(true),
                ..Default::default()
            },
            true,
        );

        controller.load_current_song().await;

        let store = controller.store();
        assert_eq!(store.current_track_id.get().as_deref(), Some("abc123"));
        assert!(store.is_playing.get());
        assert_eq!(api.calls(), vec![Call::CurrentPlayingTrack, Call::CurrentPlaybackState]);
    }

    #[tokio::test]
    async fn load_current_song_is_idle_once_metadata_is_resolved() {
        let (controller, api, _) = testing::controller(
            Responses {
                playing_track: Some(testing::track("other")),
                playback: playing(true),
                ..Default::default()
            },
            true,
        );
        controller.store().track_metadata.set(Some(testing::track("abc123")));

        controller.load_current_song().await;
        controller.load_current_song().await;

        assert!(api.calls().is_empty());
        assert_eq!(controller.store().current_track_id.get(), None);
    }

    #[tokio::test]
    async fn load_current_song_without_credential_is_a_no_op() {
        let (controller, api, _) = testing::controller(Responses::default(), false);
        controller.load_current_song().await;
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn nothing_playing_clears_the_mirror() {
        let (controller, _, _) = testing::controller(Responses::default(), true);
        controller.store().is_playing.set(true);

        controller.load_current_song().await;

        assert_eq!(controller.store().current_track_id.get(), None);
        assert!(!controller.store().is_playing.get());
    }

    #[tokio::test]
    async fn failed_read_leaves_store_untouched() {
        let (controller, api, _) = testing::controller(
            Responses {
                reject_reads: true,
                ..Default::default()
            },
            true,
        );
        controller.store().current_track_id.set(Some("kept".into()));

        controller.load_current_song().await;

        assert_eq!(api.calls(), vec![Call::CurrentPlayingTrack]);
        assert_eq!(controller.store().current_track_id.get().as_deref(), Some("kept"));
    }

    #[tokio::test]
    async fn toggle_pauses_when_server_is_playing() {
        let (controller, api, _) = testing::controller(
            Responses {
                playback: playing(true),
                ..Default::default()
            },
            true,
        );
        controller.store().is_playing.set(true);

        controller.toggle_play_pause().await;

        assert_eq!(api.calls(), vec![Call::CurrentPlaybackState, Call::Pause]);
        assert!(!controller.store().is_playing.get());
    }

    #[tokio::test]
    async fn toggle_plays_when_server_is_paused() {
        let (controller, api, _) = testing::controller(
            Responses {
                playback: playing(false),
                ..Default::default()
            },
            true,
        );

        controller.toggle_play_pause().await;

        assert_eq!(api.calls(), vec![Call::CurrentPlaybackState, Call::Play]);
        assert!(controller.store().is_playing.get());
    }

    #[tokio::test]
    async fn toggle_follows_server_not_local_flag() {
        // Local mirror says paused, another device started playback
        let (controller, api, _) = testing::controller(
            Responses {
                playback: playing(true),
                ..Default::default()
            },
            true,
        );

        controller.toggle_play_pause().await;

        assert_eq!(api.count(&Call::Pause), 1);
        assert!(!controller.store().is_playing.get());
    }

    #[tokio::test]
    async fn toggle_writes_flag_even_when_command_is_refused() {
        let (controller, _, _) = testing::controller(
            Responses {
                playback: playing(false),
                reject_commands: true,
                ..Default::default()
            },
            true,
        );

        controller.toggle_play_pause().await;

        assert!(controller.store().is_playing.get());
    }

    #[tokio::test]
    async fn toggle_without_playback_context_sends_play() {
        let (controller, api, _) = testing::controller(Responses::default(), true);

        controller.toggle_play_pause().await;

        assert_eq!(api.calls(), vec![Call::CurrentPlaybackState, Call::Play]);
        assert!(controller.store().is_playing.get());
    }

    #[tokio::test]
    async fn skip_rejection_is_swallowed_and_store_unchanged() {
        let (controller, api, _) = testing::controller(
            Responses {
                reject_commands: true,
                ..Default::default()
            },
            true,
        );
        let store = controller.store();
        store.current_track_id.set(Some("abc123".into()));
        store.is_playing.set(true);
        let before = store.playback_snapshot();

        controller.skip_next().await;
        controller.skip_previous().await;

        let after = store.playback_snapshot();
        assert_eq!(api.calls(), vec![Call::SkipToNext, Call::SkipToPrevious]);
        assert_eq!(after.current_track_id, before.current_track_id);
        assert_eq!(after.is_playing, before.is_playing);
        assert_eq!(after.volume, before.volume);
    }

    #[tokio::test(start_paused = true)]
    async fn volume_burst_sends_one_call_with_last_value() {
        let (controller, api, _) = testing::controller(Responses::default(), true);

        for volume in [51, 55, 60, 72, 64] {
            controller.set_volume(volume);
        }
        settle_debounce().await;

        assert_eq!(api.calls(), vec![Call::SetVolume(64)]);
        assert_eq!(controller.store().volume.get(), 64);
    }

    #[tokio::test(start_paused = true)]
    async fn step_controls_never_send_edge_values() {
        let (controller, api, _) = testing::controller(Responses::default(), true);

        controller.set_volume(10);
        settle_debounce().await;
        controller.volume_down();
        settle_debounce().await;
        assert_eq!(controller.store().volume.get(), 0);

        controller.set_volume(90);
        settle_debounce().await;
        controller.volume_up();
        settle_debounce().await;
        assert_eq!(controller.store().volume.get(), 100);

        assert_eq!(api.calls(), vec![Call::SetVolume(10), Call::SetVolume(90)]);
    }

    #[tokio::test(start_paused = true)]
    async fn step_controls_saturate_at_the_edges() {
        let (controller, api, _) = testing::controller(Responses::default(), true);

        controller.set_volume(95);
        controller.volume_up();
        assert_eq!(controller.store().volume.get(), 100);
        controller.volume_up();
        assert_eq!(controller.store().volume.get(), 100);

        controller.set_volume(5);
        controller.volume_down();
        assert_eq!(controller.store().volume.get(), 0);
        controller.volume_down();
        assert_eq!(controller.store().volume.get(), 0);

        settle_debounce().await;
        // Edge values never reach the debouncer, so the last one that did wins
        assert_eq!(api.calls(), vec![Call::SetVolume(5)]);
    }

    #[tokio::test(start_paused = true)]
    async fn unchanged_volume_is_not_resent() {
        let (controller, api, _) = testing::controller(Responses::default(), true);

        controller.set_volume(40);
        settle_debounce().await;
        controller.set_volume(40);
        settle_debounce().await;

        assert_eq!(api.calls(), vec![Call::SetVolume(40)]);
    }

    #[tokio::test(start_paused = true)]
    async fn nudge_moves_by_one_and_is_debounced() {
        let (controller, api, _) = testing::controller(Responses::default(), true);
        for _ in 0..5 {
            controller.nudge_volume(1);
        }
        settle_debounce().await;
        assert_eq!(api.calls(), vec![Call::SetVolume(55)]);
    }

    #[tokio::test(start_paused = true)]
    async fn volume_waits_for_credential_at_dispatch_time() {
        let (controller, api, factory) = testing::controller(Responses::default(), false);

        controller.set_volume(40);
        factory.set_ready(true);
        settle_debounce().await;

        assert_eq!(api.calls(), vec![Call::SetVolume(40)]);
    }
}
