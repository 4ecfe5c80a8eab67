// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for statistics lookups

use std::env;
use std::time::Duration;

use crate::types::StatsError;

/// Configuration for statistics lookups
///
/// The base URL is joined to method names by plain concatenation
/// (`{base}user.info`), so it must end with a trailing slash.
#[derive(Debug, Clone)]
pub struct StatsConfig {
    /// Root endpoint of the statistics API
    pub base_url: String,
    /// Per-submission timeout in milliseconds
    pub request_timeout_ms: u64,
    /// How long an error stays visible before auto-clearing, in milliseconds
    pub error_display_ms: u64,
}

impl StatsConfig {
    /// Load configuration from environment variables
    ///
    /// Reads `CF_API_BASE_URL`, `CF_REQUEST_TIMEOUT_MS` and
    /// `CF_ERROR_DISPLAY_MS`. A missing base URL is left empty and rejected
    /// by [`validate`](Self::validate) at submission time.
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("CF_API_BASE_URL").unwrap_or_default(),
            request_timeout_ms: env::var("CF_REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            error_display_ms: env::var("CF_ERROR_DISPLAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
        }
    }

    /// Validate the configuration
    ///
    /// The base URL must be a non-empty, well-formed absolute HTTP(S) URL.
    /// Run once per submission, never cached.
    pub fn validate(&self) -> Result<(), StatsError> {
        if self.base_url.trim().is_empty() {
            return Err(StatsError::Configuration {
                reason: "API base URL is not set".to_string(),
            });
        }
        let url = reqwest::Url::parse(&self.base_url).map_err(|e| StatsError::Configuration {
            reason: format!("API base URL is malformed: {}", e),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(StatsError::Configuration {
                reason: format!("API base URL must use http or https, got {}", other),
            }),
        }
    }

    /// Per-submission timeout as a [`Duration`]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Error display window as a [`Duration`]
    pub fn error_display(&self) -> Duration {
        Duration::from_millis(self.error_display_ms)
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://codeforces.com/api/".to_string(),
            request_timeout_ms: 10_000,
            error_display_ms: 10_000,
        }
    }
}
