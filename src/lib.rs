// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Client for a competitive-programming statistics API
//!
//! Looks up a handle's profile, rating history and submission history with
//! one cancellable, strictly sequential request chain:
//! - Per-submission cancellation: a new search supersedes the previous one
//!   before any async work starts
//! - Fixed timeout racing the in-flight calls
//! - Response-shape validation normalizing non-JSON bodies and API-level
//!   failures into one error type
//! - Observable state (results, loading flag, auto-clearing error) via a
//!   watch channel

pub mod client;
pub mod config;
pub mod coordinator;
pub mod state;
pub mod types;
pub mod validator;

// Re-export commonly used types
pub use client::StatsClient;
pub use config::StatsConfig;
pub use coordinator::RequestCoordinator;
pub use state::SearchState;
pub use types::{ApiEnvelope, Problem, RatingChange, StatsError, Submission, UserProfile};
