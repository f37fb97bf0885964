//! JSON extraction from free-text model output.
//!
//! Models asked to "return only JSON" still wrap it in prose or code fences.
//! The probe is:
//! 1. the first fenced code block (```` ```json ```` or bare ```` ``` ````), if
//!    its contents parse as a JSON object;
//! 2. otherwise the first top-level balanced `{...}` span in the text;
//! 3. otherwise failure.

use crate::types::{AppError, AppResult};
use serde_json::Value;

const FENCE: &str = "```";

/// Pull a JSON object out of model output
pub fn extract_json_object(text: &str) -> AppResult<Value> {
    if let Some(block) = fenced_block(text) {
        if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(block) {
            return Ok(value);
        }
    }

    let span = first_object_span(text)
        .ok_or_else(|| AppError::MalformedSummary("no JSON object found in response".to_string()))?;

    match serde_json::from_str::<Value>(span) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err(AppError::MalformedSummary("extracted JSON is not an object".to_string())),
        Err(e) => Err(AppError::MalformedSummary(format!("invalid JSON: {}", e))),
    }
}

/// Contents of the first ```...``` block, language tag removed
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find(FENCE)? + FENCE.len();
    let after = &text[start..];

    // An info string like `json` runs up to the first newline
    let body_start = match after.find('\n') {
        Some(nl) if after[..nl].trim().chars().all(|c| c.is_ascii_alphanumeric()) => nl + 1,
        _ => 0,
    };
    let body = &after[body_start..];
    let end = body.find(FENCE)?;

    Some(body[..end].trim())
}

/// First `{` through its matching `}`, skipping braces inside string literals
fn first_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}
