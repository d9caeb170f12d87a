use serde_json::{Map, Value};

use super::LlmError;

/// Best-effort fix for output cut off by the token budget: closes any braces
/// left open when the text does not already end with `}`. Anything else that
/// is malformed is left for the parser to reject.
pub fn repair_truncated(raw: &str) -> String {
    let cleaned = strip_code_fence(raw.trim());
    let mut repaired = cleaned.to_string();

    if !repaired.ends_with('}') {
        let open = repaired.matches('{').count();
        let close = repaired.matches('}').count();
        if open > close {
            tracing::warn!(missing = open - close, "LLM JSON looks truncated, closing braces");
            repaired.push_str(&"}".repeat(open - close));
        }
    }

    repaired
}

pub fn parse_object(raw: &str) -> Result<Map<String, Value>, LlmError> {
    let repaired = repair_truncated(raw);
    let value: Value = serde_json::from_str(&repaired).map_err(|e| {
        let preview: String = repaired.chars().take(300).collect();
        LlmError::Parse(format!("{e} (raw: {preview})"))
    })?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(LlmError::Shape(format!(
            "expected a JSON object, got {}",
            type_name(&other)
        ))),
    }
}

fn strip_code_fence(text: &str) -> &str {
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(inner) => inner.strip_suffix("```").unwrap_or(inner).trim(),
        None => text,
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_json_untouched() {
        let raw = r#"{"confirmed": true}"#;
        assert_eq!(repair_truncated(raw), raw);
    }

    #[test]
    fn test_closes_missing_braces() {
        let raw = r#"{"updated_slots": {"origin": "Paris", "destination": null"#;
        let repaired = repair_truncated(raw);
        assert!(repaired.ends_with("null}}"));
        let map = parse_object(raw).unwrap();
        assert_eq!(map["updated_slots"]["origin"], "Paris");
    }

    #[test]
    fn test_strips_markdown_fence() {
        let raw = "```json\n{\"confirmed\": false}\n```";
        let map = parse_object(raw).unwrap();
        assert_eq!(map["confirmed"], false);
    }

    #[test]
    fn test_balanced_garbage_still_fails() {
        let err = parse_object("{not json at all}").unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }

    #[test]
    fn test_truncated_inside_string_fails() {
        let err = parse_object(r#"{"updated_slots": {"origin": "Par"#).unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }

    #[test]
    fn test_non_object_is_shape_error() {
        let err = parse_object("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, LlmError::Shape(_)));
    }

    #[test]
    fn test_plain_text_is_parse_error() {
        let err = parse_object("Sure! Here are your slots.").unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }
}
