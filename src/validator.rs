// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Response-shape validation
//!
//! Normalizes the API's heterogeneous failure modes (non-JSON bodies,
//! API-level error status) into [`StatsError`]. Transport failures are the
//! caller's concern and never reach this module.

use reqwest::header::CONTENT_TYPE;
use reqwest::Response;
use serde_json::Value;
use tracing::debug;

use crate::types::{ApiEnvelope, StatsError, STATUS_OK};

/// How much of a non-JSON body is kept as diagnostic context
const SNIPPET_CHARS: usize = 50;

/// Validate a response and extract its `result` payload
///
/// Rejects responses whose content type is not JSON (keeping a short body
/// snippet), payloads whose `status` is not `"OK"` (surfacing the upstream
/// `comment`), and `"OK"` payloads with no `result` field.
pub async fn validate(response: Response) -> Result<Value, StatsError> {
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let body = response.text().await.map_err(|e| StatsError::Http {
        message: e.to_string(),
    })?;

    validate_payload(&content_type, &body)
}

/// Content-type and envelope checks, split out so they are testable without
/// a live [`Response`]
fn validate_payload(content_type: &str, body: &str) -> Result<Value, StatsError> {
    if !content_type.contains("json") {
        debug!(content_type, "rejecting non-JSON response");
        return Err(StatsError::NonJson {
            snippet: body_snippet(body),
        });
    }

    let envelope: ApiEnvelope = serde_json::from_str(body).map_err(|e| StatsError::Http {
        message: format!("JSON parse error: {}", e),
    })?;

    if envelope.status != STATUS_OK {
        return Err(StatsError::Api {
            message: envelope
                .comment
                .unwrap_or_else(|| "The API reported an error".to_string()),
        });
    }

    envelope.result.ok_or_else(|| StatsError::Api {
        message: "API response is missing its result field".to_string(),
    })
}

fn body_snippet(body: &str) -> String {
    body.chars().take(SNIPPET_CHARS).collect()
}
