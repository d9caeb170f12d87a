use chrono::{Datelike, NaiveDate};

use crate::models::SlotSet;

pub const EXTRACTION_SYSTEM: &str =
    "Output ONLY complete valid JSON ending with }. No text before or after JSON.";

pub const CONFIRMATION_SYSTEM: &str = "Output ONLY valid JSON.";

pub fn extraction_prompt(
    slots: &SlotSet,
    last_question: &str,
    utterance: &str,
    today: NaiveDate,
) -> String {
    let year = today.year();
    let current_date = today.format("%B %-d, %Y");
    let filled = serde_json::to_string_pretty(slots).unwrap_or_default();

    format!(
        r#"You are a Fly Me slot extractor. Year is {year}. Current date: {current_date}.

SLOTS DEFINITION:
- "origin" = origin/departure city
- "destination" = destination city
- "departure_date" = departure date (YYYY-MM-DD)
- "return_date" = return date (YYYY-MM-DD)
- "budget" = max budget with currency

CURRENT STATE:
Already filled: {filled}
Question asked: "{last_question}"
User just said: "{utterance}"

INSTRUCTIONS:
1. Extract ONLY from the user's message what answers the missing slots.
2. NO guesses, NO defaults - only values the user stated explicitly.
3. Parse dates to YYYY-MM-DD (e.g., "15 Feb" -> "{year}-02-15").
4. Keep already filled slots UNCHANGED (copy them as-is) unless the user explicitly changes them.
5. Next priority: origin -> destination -> departure_date -> return_date -> budget.

EXAMPLES (format only):
Input: "Paris to Djerba" -> Extract origin="Paris", destination="Djerba"
Input: "15th February" -> Extract departure_date="{year}-02-15"
Input: "hi" or "ok" -> Extract nothing, all null

OUTPUT STRICT JSON (no other text):
{{
  "updated_slots": {{
    "origin": <keep existing or new value or null>,
    "destination": <keep existing or new value or null>,
    "departure_date": <keep existing or new value or null>,
    "return_date": <keep existing or new value or null>,
    "budget": <keep existing or new value or null>
  }},
  "next_missing": "<first missing slot name or 'none'>",
  "next_question": "<natural question for next slot or empty string>"
}}
"#
    )
}

pub fn confirmation_prompt(last_question: &str, utterance: &str) -> String {
    format!(
        r#"You are a confirmation intent classifier.

User message:
"{utterance}"

Question previously asked:
"{last_question}"

TASK:
Decide if the user CONFIRMS the booking details.

Rules:
- Confirmation can be explicit or implicit
- Accept natural language confirmations
- Accept short answers
- Reject questions, modifications, hesitation, or silence

OUTPUT STRICT JSON ONLY:
{{
  "confirmed": true | false
}}
"#
    )
}
