use serde_json::Value;

use crate::services::ai::json::{parse_object, type_name};
use crate::services::ai::{ChatOptions, LlmError, LlmProvider, Message};
use crate::services::prompts;
use crate::services::redact::redact;

const OPTIONS: ChatOptions = ChatOptions {
    temperature: 0.0,
    max_tokens: 50,
    json_mode: true,
};

/// Asks the model whether `utterance` confirms the summary in `last_question`.
pub async fn detect_confirmation(
    llm: &dyn LlmProvider,
    last_question: &str,
    utterance: &str,
) -> Result<bool, LlmError> {
    let prompt = prompts::confirmation_prompt(last_question, utterance);
    let messages = [Message::user(prompt)];

    let response = llm
        .chat(prompts::CONFIRMATION_SYSTEM, &messages, &OPTIONS)
        .await?;
    tracing::debug!(raw = %redact(&response), "confirmation response");

    parse_confirmation(&response)
}

pub fn parse_confirmation(response: &str) -> Result<bool, LlmError> {
    let map = parse_object(response)?;
    match map.get("confirmed") {
        Some(Value::Bool(confirmed)) => Ok(*confirmed),
        Some(other) => Err(LlmError::Shape(format!(
            "'confirmed' must be a boolean, got {}",
            type_name(other)
        ))),
        None => Err(LlmError::Shape("missing 'confirmed' key".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_confirmed() {
        assert!(parse_confirmation(r#"{"confirmed": true}"#).unwrap());
        assert!(!parse_confirmation(r#"{"confirmed": false}"#).unwrap());
    }

    #[test]
    fn test_truncated_confirmation_is_repaired() {
        assert!(parse_confirmation(r#"{"confirmed": true"#).unwrap());
    }

    #[test]
    fn test_missing_key() {
        let err = parse_confirmation(r#"{"answer": "yes"}"#).unwrap_err();
        assert!(matches!(err, LlmError::Shape(_)));
    }

    #[test]
    fn test_string_is_not_a_confirmation() {
        let err = parse_confirmation(r#"{"confirmed": "true"}"#).unwrap_err();
        assert!(matches!(err, LlmError::Shape(_)));
    }

    #[test]
    fn test_garbage() {
        let err = parse_confirmation("yes!").unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }
}
