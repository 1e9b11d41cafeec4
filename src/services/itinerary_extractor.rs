use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::errors::ExtractError;

fn fenced_json_block() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?is)```json\s*(.*?)```").expect("valid fence pattern"))
}

fn fence_marker() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)```(json)?").expect("valid marker pattern"))
}

/// Isolates the JSON payload in free-form model output.
///
/// Prefers the interior of a ```` ```json ```` fence, then the first
/// balanced `{ ... }` span that parses as a JSON object, so prose such as
/// `{placeholders}` ahead of the payload is skipped. When no span parses the
/// first balanced one is returned untouched and the validator reports it.
pub fn extract_json(text: &str) -> Result<String, ExtractError> {
    if let Some(interior) = fenced_json_block()
        .captures(text)
        .and_then(|captures| captures.get(1))
    {
        let candidate = strip_fences(interior.as_str());
        if !candidate.is_empty() {
            return Ok(candidate);
        }
    }

    let mut fallback = None;
    for (start, _) in text.match_indices('{') {
        let Some(span) = balanced_object_at(text, start) else {
            continue;
        };
        let candidate = strip_fences(span);
        if candidate.is_empty() {
            continue;
        }
        if matches!(serde_json::from_str::<Value>(&candidate), Ok(Value::Object(_))) {
            return Ok(candidate);
        }
        fallback.get_or_insert(candidate);
    }

    fallback.ok_or(ExtractError::NoJsonFound)
}

fn strip_fences(span: &str) -> String {
    fence_marker().replace_all(span, "").trim().to_string()
}

/// The `{ ... }` span opening at `start` if its braces balance, skipping
/// braces inside string literals.
fn balanced_object_at(text: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn payload() -> Value {
        json!({
            "destination": "Paris, France",
            "days": [{ "day": 1, "title": "Arrival {and} \"check-in\"", "activities": [] }]
        })
    }

    #[test]
    fn test_fenced_block() {
        let text = format!(
            "Here is your plan:\n```json\n{}\n```\nEnjoy the trip!",
            serde_json::to_string_pretty(&payload()).unwrap()
        );
        let extracted = extract_json(&text).unwrap();
        assert_eq!(serde_json::from_str::<Value>(&extracted).unwrap(), payload());
    }

    #[test]
    fn test_bare_object_with_commentary() {
        let text = format!(
            "Sure! {} Let me know if you want changes {{like this}}.",
            serde_json::to_string(&payload()).unwrap()
        );
        let extracted = extract_json(&text).unwrap();
        assert_eq!(serde_json::from_str::<Value>(&extracted).unwrap(), payload());
    }

    #[test]
    fn test_braces_inside_strings_do_not_end_span() {
        let text = r#"prefix {"a": "}", "b": {"c": "\"{"}} suffix"#;
        assert_eq!(extract_json(text).unwrap(), r#"{"a": "}", "b": {"c": "\"{"}}"#);
    }

    #[test]
    fn test_uppercase_marker_and_unlabelled_fence() {
        let upper = "```JSON\n{\"days\": []}\n```";
        assert_eq!(extract_json(upper).unwrap(), "{\"days\": []}");

        let plain = "```\n{\"days\": []}\n```";
        assert_eq!(extract_json(plain).unwrap(), "{\"days\": []}");
    }

    #[test]
    fn test_no_json_found() {
        assert_eq!(
            extract_json("I'm sorry, I can't help with that."),
            Err(ExtractError::NoJsonFound)
        );
        assert_eq!(extract_json("{ unterminated"), Err(ExtractError::NoJsonFound));
        assert_eq!(extract_json(""), Err(ExtractError::NoJsonFound));
    }

    #[test]
    fn test_empty_fence_falls_back_to_braces() {
        let text = "```json\n```\nfallback: {\"days\": []}";
        assert_eq!(extract_json(text).unwrap(), "{\"days\": []}");
    }

    #[test]
    fn test_prose_braces_before_payload_are_skipped() {
        let text = "Use {placeholders} in templates. Here it is: {\"days\": []}";
        assert_eq!(extract_json(text).unwrap(), "{\"days\": []}");

        let text = format!(
            "Replace {{city}} and {{date}} as needed:\n{}",
            serde_json::to_string(&payload()).unwrap()
        );
        let extracted = extract_json(&text).unwrap();
        assert_eq!(serde_json::from_str::<Value>(&extracted).unwrap(), payload());
    }

    #[test]
    fn test_no_semantic_validation() {
        assert_eq!(extract_json("{not json at all}").unwrap(), "{not json at all}");
    }
}
