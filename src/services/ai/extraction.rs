use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::models::{SlotKey, SlotSet};
use crate::services::ai::json::{parse_object, type_name};
use crate::services::ai::{ChatOptions, LlmError, LlmProvider, Message};
use crate::services::prompts;
use crate::services::redact::redact;

const OPTIONS: ChatOptions = ChatOptions {
    temperature: 0.0,
    max_tokens: 500,
    json_mode: true,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub updated_slots: SlotSet,
    pub next_missing: Option<SlotKey>,
    pub next_question: String,
}

impl Extraction {
    /// Canned result used when the model cannot be trusted: nothing changes and
    /// the next question comes from the static table.
    pub fn fallback(current: &SlotSet) -> Self {
        let next_missing = current.missing().first().copied();
        Self {
            updated_slots: current.clone(),
            next_missing,
            next_question: next_missing
                .map(|k| k.question().to_string())
                .unwrap_or_default(),
        }
    }
}

pub async fn extract_slots(
    llm: &dyn LlmProvider,
    current: &SlotSet,
    last_question: &str,
    utterance: &str,
    today: NaiveDate,
) -> Result<Extraction, LlmError> {
    let prompt = prompts::extraction_prompt(current, last_question, utterance, today);
    let messages = [Message::user(prompt)];

    let response = llm
        .chat(prompts::EXTRACTION_SYSTEM, &messages, &OPTIONS)
        .await?;
    tracing::debug!(raw = %redact(&response), "extraction response");

    parse_extraction(&response, current)
}

pub fn parse_extraction(response: &str, current: &SlotSet) -> Result<Extraction, LlmError> {
    let map = parse_object(response)?;

    let updated_slots = match map.get("updated_slots") {
        Some(Value::Object(slots)) => slots_from_json(slots),
        Some(other) => {
            return Err(LlmError::Shape(format!(
                "'updated_slots' must be an object, got {}",
                type_name(other)
            )))
        }
        None => return Err(LlmError::Shape("missing 'updated_slots' key".to_string())),
    };

    let next_missing = match map.get("next_missing").and_then(Value::as_str) {
        Some(name) => SlotKey::parse(name.trim()),
        None => {
            let mut merged = current.clone();
            merged.apply(&updated_slots);
            merged.missing().first().copied()
        }
    };

    let next_question = map
        .get("next_question")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(Extraction {
        updated_slots,
        next_missing,
        next_question,
    })
}

fn slots_from_json(map: &Map<String, Value>) -> SlotSet {
    let mut slots = SlotSet::default();
    for key in SlotKey::ALL {
        if let Some(value) = map.get(key.as_str()).and_then(slot_value) {
            slots.set(key, value);
        }
    }
    slots
}

/// Models sometimes answer `""` or `"null"` for an absent value, or a bare
/// number for the budget.
fn slot_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            let absent = s.is_empty() || s.eq_ignore_ascii_case("null") || s.eq_ignore_ascii_case("none");
            (!absent).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_extraction() {
        let json = r#"{"updated_slots":{"origin":"Paris","destination":"Tokyo","departure_date":null,"return_date":null,"budget":null},"next_missing":"departure_date","next_question":"When do you leave?"}"#;
        let result = parse_extraction(json, &SlotSet::default()).unwrap();
        assert_eq!(result.updated_slots.get(SlotKey::Origin), Some("Paris"));
        assert_eq!(result.updated_slots.get(SlotKey::Destination), Some("Tokyo"));
        assert_eq!(result.next_missing, Some(SlotKey::DepartureDate));
        assert_eq!(result.next_question, "When do you leave?");
    }

    #[test]
    fn test_missing_updated_slots_is_shape_error() {
        let err = parse_extraction(r#"{"next_missing":"origin"}"#, &SlotSet::default()).unwrap_err();
        assert!(matches!(err, LlmError::Shape(_)));
    }

    #[test]
    fn test_updated_slots_wrong_type_is_shape_error() {
        let err = parse_extraction(r#"{"updated_slots":"Paris"}"#, &SlotSet::default()).unwrap_err();
        assert!(matches!(err, LlmError::Shape(_)));
    }

    #[test]
    fn test_synthesizes_next_missing() {
        let mut current = SlotSet::default();
        current.set(SlotKey::Origin, "Paris");
        let result =
            parse_extraction(r#"{"updated_slots":{"destination":"Tokyo"}}"#, &current).unwrap();
        assert_eq!(result.next_missing, Some(SlotKey::DepartureDate));
        assert_eq!(result.next_question, "");
    }

    #[test]
    fn test_next_missing_none() {
        let result = parse_extraction(
            r#"{"updated_slots":{},"next_missing":"none","next_question":""}"#,
            &SlotSet::default(),
        )
        .unwrap();
        assert_eq!(result.next_missing, None);
    }

    #[test]
    fn test_blank_and_placeholder_values_are_null() {
        let json = r#"{"updated_slots":{"origin":"","destination":"null","budget":800,"return_date":true}}"#;
        let result = parse_extraction(json, &SlotSet::default()).unwrap();
        assert_eq!(result.updated_slots.get(SlotKey::Origin), None);
        assert_eq!(result.updated_slots.get(SlotKey::Destination), None);
        assert_eq!(result.updated_slots.get(SlotKey::ReturnDate), None);
        assert_eq!(result.updated_slots.get(SlotKey::Budget), Some("800"));
    }

    #[test]
    fn test_truncated_reply_is_repaired() {
        let json = r#"{"updated_slots":{"origin":"Lyon","destination":null},"next_missing":"destination""#;
        let result = parse_extraction(json, &SlotSet::default()).unwrap();
        assert_eq!(result.updated_slots.get(SlotKey::Origin), Some("Lyon"));
    }

    #[test]
    fn test_fallback_keeps_slots() {
        let mut current = SlotSet::default();
        current.set(SlotKey::Origin, "Paris");
        let fallback = Extraction::fallback(&current);
        assert_eq!(fallback.updated_slots, current);
        assert_eq!(fallback.next_missing, Some(SlotKey::Destination));
        assert_eq!(fallback.next_question, SlotKey::Destination.question());
    }
}
