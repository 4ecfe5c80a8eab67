// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for competitive-programming statistics lookups

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Success sentinel in the API response envelope
pub const STATUS_OK: &str = "OK";

/// A user profile record returned by the `user.info` method
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// The user's handle
    pub handle: String,
    /// Current rating, absent for unrated users
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
    /// All-time maximum rating
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rating: Option<i64>,
    /// Current rank title (e.g. "expert")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    /// All-time maximum rank title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rank: Option<String>,
    /// Country if the user filled it in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Organization if the user filled it in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    /// Community contribution score
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contribution: Option<i64>,
    /// Number of users who friended this user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friend_of_count: Option<u64>,
    /// Avatar image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// One rating-change event returned by the `user.rating` method
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingChange {
    /// Contest the change came from
    pub contest_id: u64,
    /// Contest name
    pub contest_name: String,
    /// Handle the change applies to
    pub handle: String,
    /// Rank achieved in the contest
    pub rank: u64,
    /// Unix time the rating was updated
    pub rating_update_time_seconds: u64,
    /// Rating before the contest
    pub old_rating: i64,
    /// Rating after the contest
    pub new_rating: i64,
}

/// Problem metadata embedded in a submission record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    /// Contest the problem belongs to, absent for problemset tasks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contest_id: Option<u64>,
    /// Problem index within the contest (e.g. "A", "B1")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    /// Problem name
    pub name: String,
    /// Difficulty rating if published
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u64>,
    /// Problem tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// One submission record returned by the `user.status` method
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Submission ID
    pub id: u64,
    /// Contest the submission was made in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contest_id: Option<u64>,
    /// Unix time the submission was created
    pub creation_time_seconds: u64,
    /// The problem submitted against
    pub problem: Problem,
    /// Language the solution was written in
    pub programming_language: String,
    /// Verdict, absent while the submission is still judging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<String>,
}

/// Response envelope shared by every API method
///
/// Every method answers with `{"status": "OK", "result": ...}` on success or
/// `{"status": "FAILED", "comment": "..."}` on failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    /// `"OK"` on success, anything else is a failure
    pub status: String,
    /// Upstream-provided failure detail
    #[serde(default)]
    pub comment: Option<String>,
    /// Method-specific payload, present when status is `"OK"`
    #[serde(default)]
    pub result: Option<Value>,
}

/// Errors that can occur during a statistics lookup
#[derive(Debug, Error)]
pub enum StatsError {
    /// API base URL missing or malformed
    #[error("Invalid API configuration: {reason}")]
    Configuration {
        /// What is wrong with the configuration
        reason: String,
    },

    /// The submitted handle trimmed to an empty string
    #[error("Handle must not be empty")]
    InvalidHandle,

    /// The submission's token was invalidated (new search or timeout)
    #[error("Request cancelled")]
    Cancelled,

    /// The API answered with something other than JSON
    #[error("Non-JSON response from API: {snippet}")]
    NonJson {
        /// First characters of the raw body, for diagnostics
        snippet: String,
    },

    /// The API answered with JSON signalling failure
    #[error("API error: {message}")]
    Api {
        /// Upstream comment, or a generic fallback
        message: String,
    },

    /// Any other transport or decoding failure
    #[error("{message}")]
    Http {
        /// Underlying error text
        message: String,
    },
}

impl StatsError {
    /// Render the user-facing message for this error
    ///
    /// Non-JSON responses get a multi-line diagnostic listing the likely
    /// causes; API errors surface the upstream comment verbatim.
    pub fn user_message(&self) -> String {
        match self {
            StatsError::Configuration { reason } => {
                format!("Configuration error: {}", reason)
            }
            StatsError::InvalidHandle => "Please enter a handle before searching.".to_string(),
            StatsError::Cancelled => "Request cancelled".to_string(),
            StatsError::NonJson { snippet } => format!(
                "The API returned a non-JSON response.\n\
                 Likely causes: the upstream service is down, the handle is \
                 invalid, or requests are being rate limited.\n\
                 Response began with: {}",
                snippet
            ),
            StatsError::Api { message } => message.clone(),
            StatsError::Http { message } => message.clone(),
        }
    }
}
