// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Typed client for the statistics API
//!
//! Wraps a [`reqwest::Client`] and decodes validated payloads into the typed
//! records in [`crate::types`]. Each lookup is a single GET; sequencing and
//! cancellation live in the coordinator.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::types::{RatingChange, StatsError, Submission, UserProfile};
use crate::validator;

/// Typed client for the statistics API
pub struct StatsClient {
    client: Client,
    base_url: String,
}

impl StatsClient {
    /// Create a client against the given base URL
    ///
    /// The timeout is a transport-level backstop; the coordinator's timer is
    /// what normally ends a slow submission.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StatsError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StatsError::Http {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Look up the profile for a handle via `user.info`
    ///
    /// The method answers with an array of users; a single-handle query
    /// yields exactly one element, and an empty array is treated as an API
    /// error.
    pub async fn user_info(&self, handle: &str) -> Result<UserProfile, StatsError> {
        let result = self.get_validated("user.info", &[("handles", handle)]).await?;
        let users: Vec<UserProfile> =
            serde_json::from_value(result).map_err(|e| StatsError::Http {
                message: format!("Unexpected user.info payload: {}", e),
            })?;
        users.into_iter().next().ok_or_else(|| StatsError::Api {
            message: format!("No user found for handle {}", handle),
        })
    }

    /// Look up the rating history for a handle via `user.rating`
    pub async fn user_rating(&self, handle: &str) -> Result<Vec<RatingChange>, StatsError> {
        let result = self.get_validated("user.rating", &[("handle", handle)]).await?;
        serde_json::from_value(result).map_err(|e| StatsError::Http {
            message: format!("Unexpected user.rating payload: {}", e),
        })
    }

    /// Look up the submission history for a handle via `user.status`
    pub async fn user_status(&self, handle: &str) -> Result<Vec<Submission>, StatsError> {
        let result = self.get_validated("user.status", &[("handle", handle)]).await?;
        serde_json::from_value(result).map_err(|e| StatsError::Http {
            message: format!("Unexpected user.status payload: {}", e),
        })
    }

    /// Issue one GET and run the response through the validator
    async fn get_validated(
        &self,
        method: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, StatsError> {
        // The API joins method names onto the base by plain concatenation.
        let url = format!("{}{}", self.base_url, method);
        debug!(%url, "issuing API request");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    StatsError::Cancelled
                } else {
                    StatsError::Http {
                        message: e.to_string(),
                    }
                }
            })?;

        validator::validate(response).await
    }
}
