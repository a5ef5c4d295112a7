//! Shared HTTP helpers

use anyhow::{Context, Result};
use url::Url;

/// Join an API path onto a base URL, keeping any path prefix of the base
/// (e.g. `https://api.openai.com/v1` + `chat/completions`).
pub fn endpoint(base_url: &str, path: &str) -> Result<Url> {
    let base = format!("{}/", base_url.trim_end_matches('/'));
    let base = Url::parse(&base).with_context(|| format!("Invalid base URL: {}", base_url))?;
    base.join(path.trim_start_matches('/'))
        .with_context(|| format!("Invalid API path: {}", path))
}

/// First `max` characters of a response body, for log lines and errors
pub fn preview(body: &str, max: usize) -> &str {
    match body.char_indices().nth(max) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
