//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that reconciles the local
//! store with the remote service and reacts to user input.
//! It is organized into submodules by responsibility:
//!
//! - `playback`: Play/pause, skip and volume commands
//! - `debounce`: Collapses bursts of values into one dispatch
//! - `metadata`: Resolves track metadata for the current track id
//! - `library`: Playlist collection and selection
//! - `effects`: Watchers that re-run mount logic when state changes
//! - `input`: Key event handling

mod playback;
mod debounce;
mod metadata;
mod library;
mod effects;
mod input;

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::model::{ApiError, ApiResult, ClientFactory, Store};

use debounce::Debouncer;
use playback::VOLUME_DEBOUNCE;

/// Everything a component may touch: the shared store and a way to reach
/// the remote API. Passed explicitly instead of living in a global.
#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<Store>,
    pub clients: Arc<dyn ClientFactory>,
}

impl AppContext {
    pub fn new(store: Arc<Store>, clients: Arc<dyn ClientFactory>) -> Self {
        Self { store, clients }
    }
}

#[derive(Clone)]
pub struct AppController {
    pub(crate) ctx: AppContext,
    volume_dispatch: Debouncer<u8>,
    /// Set once the first player mount has queued the starting volume
    volume_announced: Arc<AtomicBool>,
}

impl AppController {
    /// Must be called inside a tokio runtime; the volume debouncer runs as a task
    pub fn new(ctx: AppContext) -> Self {
        let clients = ctx.clients.clone();
        let volume_dispatch = Debouncer::spawn(VOLUME_DEBOUNCE, move |percent: u8| {
            let clients = clients.clone();
            async move {
                // Resolve the client now, not when the debouncer was built
                let result = match clients.require().await {
                    Ok(api) => api.set_volume(percent).await,
                    Err(e) => Err(e),
                };
                if Self::settle("set_volume", result).is_some() {
                    tracing::info!(percent, "Volume dispatched");
                }
            }
        });

        Self {
            ctx,
            volume_dispatch,
            volume_announced: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.ctx.store
    }

    /// Boundary for every remote failure. Nothing is shown to the user; the
    /// failure is logged and the caller keeps its current state.
    pub(crate) fn settle<T>(operation: &'static str, result: ApiResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(ApiError::NotReady) => {
                tracing::debug!(operation, "Skipped, no credential yet");
                None
            }
            Err(e @ ApiError::Forbidden(_)) => {
                // Non-premium accounts get 403 on player commands
                tracing::warn!(operation, error = %e, "Request refused");
                None
            }
            Err(e) => {
                tracing::error!(operation, error = %e, "Remote call failed");
                None
            }
        }
    }
}
