//! Trailing-edge debouncer

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

/// Collapses a burst of submitted values into a single dispatch.
///
/// A background task owns the pending value. Every [`submit`](Self::submit)
/// replaces it and restarts the quiet window; once the window passes with
/// nothing new, the last value is dispatched. Dropping every handle flushes
/// whatever is still pending.
#[derive(Clone)]
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn spawn<F, Fut>(window: Duration, dispatch: F) -> Self
    where
        F: Fn(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();

        tokio::spawn(async move {
            let mut pending: Option<T> = None;
            loop {
                match pending.take() {
                    None => match rx.recv().await {
                        Some(value) => pending = Some(value),
                        None => break,
                    },
                    Some(last) => match timeout(window, rx.recv()).await {
                        Ok(Some(value)) => pending = Some(value),
                        Ok(None) => {
                            dispatch(last).await;
                            break;
                        }
                        Err(_) => dispatch(last).await,
                    },
                }
            }
            tracing::trace!("Debouncer stopped");
        });

        Self { tx }
    }

    pub fn submit(&self, value: T) {
        if self.tx.send(value).is_err() {
            tracing::warn!("Debouncer task is gone, value dropped");
        }
    }
}
