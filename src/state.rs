// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Observable search state
//!
//! The coordinator publishes results through a [`watch`] channel guarded by a
//! per-submission generation number: every write names the generation it
//! belongs to, and writes from a superseded generation are dropped. The
//! generation rotates under the same lock that cancels the previous token, so
//! a stale sequence can never overwrite a newer one.

use std::sync::Mutex;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::types::{RatingChange, Submission, UserProfile};

/// Everything a subscriber sees about the current search
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    /// Profile from the `user.info` call
    pub profile: Option<UserProfile>,
    /// Rating history from the `user.rating` call
    pub ratings: Option<Vec<RatingChange>>,
    /// Submission history from the `user.status` call
    pub submissions: Option<Vec<Submission>>,
    /// True while a submission is in flight
    pub loading: bool,
    /// User-facing error message, auto-cleared after the display window
    pub error: Option<String>,
}

/// One search attempt: its generation and its cancellation token
struct Attempt {
    generation: u64,
    token: CancellationToken,
}

/// Generation-guarded publisher for [`SearchState`]
pub struct StatePublisher {
    tx: watch::Sender<SearchState>,
    current: Mutex<Attempt>,
}

impl StatePublisher {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(SearchState::default());
        Self {
            tx,
            current: Mutex::new(Attempt {
                generation: 0,
                token: CancellationToken::new(),
            }),
        }
    }

    /// Subscribe to state updates
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.tx.subscribe()
    }

    /// Start a new attempt
    ///
    /// Cancels the previous attempt's token and rotates the generation,
    /// both under the lock, so in-flight work from the old attempt is dead
    /// before this returns.
    pub fn begin(&self) -> (u64, CancellationToken) {
        let mut current = self.current.lock().expect("state lock poisoned");
        current.token.cancel();
        current.generation += 1;
        current.token = CancellationToken::new();
        (current.generation, current.token.clone())
    }

    /// Apply `f` to the state if `generation` is still current
    ///
    /// Returns whether the write was applied. The guard check and the
    /// channel write happen under the attempt lock, so a concurrent
    /// [`begin`](Self::begin) cannot slip between them.
    pub fn publish<F>(&self, generation: u64, f: F) -> bool
    where
        F: FnOnce(&mut SearchState),
    {
        let current = self.current.lock().expect("state lock poisoned");
        if current.generation != generation {
            return false;
        }
        self.tx.send_modify(f);
        true
    }
}

impl Default for StatePublisher {
    fn default() -> Self {
        Self::new()
    }
}
