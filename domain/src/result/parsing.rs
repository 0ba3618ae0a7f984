//! Result extraction from free-form model output.
//!
//! Models are told to answer with JSON only, but some still wrap the object
//! in prose or a markdown fence. These functions are pure: no I/O, just
//! scanning and decoding.
//!
//! | Function | Purpose |
//! |----------|---------|
//! | [`extract_json_object`] | First balanced `{...}` that decodes as a JSON object |
//! | [`parse_model_result`] | Extract, decode and validate a [`ModelResult`] |

use super::model_result::ModelResult;
use crate::core::error::ParseError;
use serde_json::Value;

/// Find the first balanced `{...}` substring that decodes as a JSON object.
///
/// Braces inside JSON strings (including escaped quotes) are ignored while
/// balancing. Candidates that are balanced but not valid JSON are skipped;
/// if every candidate fails to decode, the first decode error is returned.
pub fn extract_json_object(text: &str) -> Result<Value, ParseError> {
    let mut first_error = None;

    for (start, _) in text.match_indices('{') {
        let Some(end) = balanced_end(&text[start..]) else {
            continue;
        };
        let candidate = &text[start..start + end];
        match serde_json::from_str::<Value>(candidate) {
            Ok(value @ Value::Object(_)) => return Ok(value),
            Ok(_) => {}
            Err(e) => {
                first_error.get_or_insert_with(|| e.to_string());
            }
        }
    }

    Err(match first_error {
        Some(message) => ParseError::InvalidJson(message),
        None => ParseError::NoJsonObject,
    })
}

/// Byte length of the balanced object starting at the beginning of `text`
fn balanced_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + c.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse and validate a provider's raw text into a [`ModelResult`].
///
/// # Errors
///
/// - [`ParseError::NoJsonObject`] when the text holds no balanced object
/// - [`ParseError::InvalidJson`] when no candidate decodes
/// - [`ParseError::Validation`] when the object breaks the result contract
///
/// ```
/// use dilemma_domain::result::parsing::parse_model_result;
///
/// let text = r#"Sure! {"decision":"B","confidence":77,"key_assumptions":[],
///     "reasoning_summary":"x","what_changed_by_if":"初回"} Hope that helps."#;
/// assert_eq!(parse_model_result(text).unwrap().confidence, 77);
/// assert!(parse_model_result("I cannot decide.").is_err());
/// ```
pub fn parse_model_result(text: &str) -> Result<ModelResult, ParseError> {
    let value = extract_json_object(text.trim())?;
    ModelResult::from_value(value)
}
