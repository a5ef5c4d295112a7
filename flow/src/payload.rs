//! Decoding of JSON payloads returned by LLMs and sub-pipelines

use serde::de::DeserializeOwned;

use crate::state::Generated;

/// Strip a surrounding markdown code fence (```` ```json ... ``` ````), if any.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening line
    match body.split_once('\n') {
        Some((tag, inner)) if !tag.trim().contains(char::is_whitespace) => inner.trim(),
        _ => body.trim(),
    }
}

/// Decode a sub-pipeline payload, substituting the sentinel on failure
pub fn decode_payload<T: DeserializeOwned>(raw: &str, label: &str) -> Generated<T> {
    match serde_json::from_str::<T>(strip_code_fence(raw)) {
        Ok(value) => Generated::Parsed(value),
        Err(e) => {
            tracing::error!("JSON Decode Error in {} output ({:?}): {}", label, e.classify(), e);
            Generated::invalid_json()
        }
    }
}
