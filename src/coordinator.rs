// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request orchestration
//!
//! Sequences the three dependent lookups for a handle, with per-submission
//! cancellation and a fixed timeout. A new submission cancels the previous
//! one synchronously before any async work starts; the three calls are
//! strictly sequential (never parallel), so a subscriber either sees all
//! three results or a single error, never a mix of two submissions.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::StatsClient;
use crate::config::StatsConfig;
use crate::state::{SearchState, StatePublisher};
use crate::types::StatsError;

/// Coordinates one cancellable lookup sequence at a time
///
/// Cheap to clone; clones share the same state channel and cancellation
/// scope. Must be used inside a tokio runtime.
#[derive(Clone)]
pub struct RequestCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    config: StatsConfig,
    publisher: StatePublisher,
}

impl RequestCoordinator {
    /// Create a coordinator with the given configuration
    pub fn new(config: StatsConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                publisher: StatePublisher::new(),
            }),
        }
    }

    /// Create a coordinator configured from the environment
    pub fn from_env() -> Self {
        Self::new(StatsConfig::from_env())
    }

    /// Subscribe to search state updates
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.publisher.subscribe()
    }

    /// Submit a search for a handle
    ///
    /// Fire-and-forget: cancels any in-flight submission, resets the
    /// published state and drives the three lookups in the background.
    /// Outcomes arrive on the channel from [`subscribe`](Self::subscribe).
    pub fn submit(&self, handle: &str) {
        let handle = handle.trim().to_string();
        let inner = self.inner.clone();

        // Cancel the previous attempt and reset the state before anything
        // asynchronous happens, so no stale write can land after this point.
        let (generation, token) = inner.publisher.begin();
        inner.publisher.publish(generation, |state| {
            *state = SearchState {
                loading: true,
                ..SearchState::default()
            };
        });

        // Configuration is checked on every submission, never cached.
        if let Err(error) = inner.config.validate() {
            report_failure(inner, generation, error);
            return;
        }
        if handle.is_empty() {
            report_failure(inner, generation, StatsError::InvalidHandle);
            return;
        }

        info!(%handle, "starting search");

        // The timer cancels the submission token on expiry, so whichever of
        // the timer and the in-flight call settles first decides the outcome.
        let timeout = inner.config.request_timeout();
        let timer_token = token.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            debug!("submission timed out, cancelling token");
            timer_token.cancel();
        });

        tokio::spawn(async move {
            let outcome = run_sequence(&inner, generation, &token, &handle).await;
            timer.abort();

            match outcome {
                Ok(()) => {
                    info!(%handle, "search complete");
                    inner
                        .publisher
                        .publish(generation, |state| state.loading = false);
                }
                Err(error) => report_failure(inner, generation, error),
            }
        });
    }
}

/// Drive the three lookups in order, publishing each result as it lands
///
/// Call N+1 is not issued until call N's payload has been published.
async fn run_sequence(
    inner: &Inner,
    generation: u64,
    token: &CancellationToken,
    handle: &str,
) -> Result<(), StatsError> {
    let client = StatsClient::new(&inner.config.base_url, inner.config.request_timeout())?;

    let profile = guarded(token, client.user_info(handle)).await?;
    debug!(handle, "profile received");
    inner
        .publisher
        .publish(generation, move |state| state.profile = Some(profile));

    let ratings = guarded(token, client.user_rating(handle)).await?;
    debug!(handle, count = ratings.len(), "rating history received");
    inner
        .publisher
        .publish(generation, move |state| state.ratings = Some(ratings));

    let submissions = guarded(token, client.user_status(handle)).await?;
    debug!(handle, count = submissions.len(), "submissions received");
    inner
        .publisher
        .publish(generation, move |state| {
            state.submissions = Some(submissions)
        });

    Ok(())
}

/// Race one lookup against the submission token
///
/// A call whose token was cancelled while it was in flight resolves as
/// cancelled even if the transport already produced a result.
async fn guarded<T, F>(token: &CancellationToken, call: F) -> Result<T, StatsError>
where
    F: Future<Output = Result<T, StatsError>>,
{
    tokio::select! {
        _ = token.cancelled() => Err(StatsError::Cancelled),
        result = call => {
            if token.is_cancelled() {
                return Err(StatsError::Cancelled);
            }
            result
        }
    }
}

/// Publish a terminal error and schedule its auto-clear
///
/// Partial results from earlier stages are cleared along with the loading
/// flag, so a failed search never leaves partial data behind. The error
/// disappears after the display window unless a new submission supersedes
/// the timer first.
fn report_failure(inner: Arc<Inner>, generation: u64, error: StatsError) {
    warn!(%error, "search failed");
    let message = error.user_message();
    inner.publisher.publish(generation, move |state| {
        state.loading = false;
        state.profile = None;
        state.ratings = None;
        state.submissions = None;
        state.error = Some(message);
    });

    let display = inner.config.error_display();
    tokio::spawn(async move {
        tokio::time::sleep(display).await;
        if inner
            .publisher
            .publish(generation, |state| state.error = None)
        {
            debug!("error message auto-cleared");
        }
    });
}
