//! Tolerant conversion of artifact text into structured JSON.
//!
//! LLM-generated artifacts frequently wrap their JSON payload in a fenced
//! markdown code block, or fail to produce valid JSON at all. The file
//! endpoint never fails a response over this: parsing degrades to a
//! pass-through payload carrying the raw text and an error marker.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

/// Matches a triple-backtick fenced block, optionally tagged `json`.
static FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:json)?[ \t]*\n(.*?)```").expect("fenced block regex"));

/// Extract the inner content of the first fenced code block, if any.
pub fn fenced_block(text: &str) -> Option<&str> {
    FENCED_BLOCK
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Best-effort JSON parse, tolerating markdown fences.
///
/// Tries a direct parse first, then the contents of a fenced code block.
pub fn parse_json(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Some(value);
    }

    fenced_block(text).and_then(|inner| serde_json::from_str::<Value>(inner.trim()).ok())
}

/// Parse artifact text as JSON, tolerating markdown fences.
///
/// Like [`parse_json`], but when parsing fails the original text is passed
/// through unchanged as `{"error": ..., "raw": <text>}`. This function
/// never errors: a malformed artifact degrades, it does not abort the
/// response.
pub fn extract_json(text: &str) -> Value {
    parse_json(text).unwrap_or_else(|| {
        json!({
            "error": "artifact is not valid JSON",
            "raw": text,
        })
    })
}
