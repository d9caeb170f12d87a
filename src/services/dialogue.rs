use chrono::{NaiveDate, Utc};

use crate::models::{DialogueState, Session, SlotKey, SlotSet, TurnResult};
use crate::services::ai::confirmation::detect_confirmation;
use crate::services::ai::extraction::{extract_slots, Extraction};
use crate::services::ai::LlmProvider;

/// Number of confirmation summaries shown before giving up on the cycle.
pub const MAX_CONFIRMATION_ATTEMPTS: u8 = 3;

pub const CONFIRMED_TEXT: &str = "Booking details confirmed. Your request is being processed.";

pub const CONFIRMATION_FAILED_TEXT: &str = "We couldn't get your confirmation.\n\
If you want to modify anything, please tell me what to change.";

/// Advances `session` by one user utterance. Never fails: LLM problems degrade
/// to canned replies and are flagged through `TurnResult::fallback`.
pub async fn run_turn(
    session: &mut Session,
    llm: &dyn LlmProvider,
    utterance: &str,
    today: NaiveDate,
) -> TurnResult {
    session.last_activity = Utc::now();

    match session.state {
        DialogueState::Collecting => collect(session, llm, utterance, today).await,
        DialogueState::WaitingConfirmation { attempts } => {
            confirm(session, llm, utterance, attempts).await
        }
        DialogueState::Confirmed => TurnResult {
            confirmed: Some(true),
            ..reply(session, CONFIRMED_TEXT, vec![], true, false)
        },
    }
}

async fn collect(
    session: &mut Session,
    llm: &dyn LlmProvider,
    utterance: &str,
    today: NaiveDate,
) -> TurnResult {
    let (extraction, fallback) =
        match extract_slots(llm, &session.slots, &session.last_question, utterance, today).await {
            Ok(extraction) => (extraction, false),
            Err(e) => {
                tracing::warn!(session_id = %session.id, error = %e, "slot extraction failed, using fallback");
                (Extraction::fallback(&session.slots), true)
            }
        };

    tracing::debug!(
        session_id = %session.id,
        next_missing = ?extraction.next_missing,
        next_question = %extraction.next_question,
        "model suggestion"
    );

    session.slots.apply(&extraction.updated_slots);
    let missing = session.slots.missing();

    match missing.first().copied() {
        None => {
            session.state = DialogueState::WaitingConfirmation { attempts: 1 };
            let text = confirmation_summary(&session.slots);
            session.last_question = text.clone();
            reply(session, &text, missing, false, fallback)
        }
        Some(next) => {
            let text = next.question();
            session.last_question = text.to_string();
            reply(session, text, missing, false, fallback)
        }
    }
}

async fn confirm(
    session: &mut Session,
    llm: &dyn LlmProvider,
    utterance: &str,
    attempts: u8,
) -> TurnResult {
    let (confirmed, fallback) =
        match detect_confirmation(llm, &session.last_question, utterance).await {
            Ok(confirmed) => (confirmed, false),
            Err(e) => {
                tracing::warn!(session_id = %session.id, error = %e, "confirmation check failed, treating as not confirmed");
                (false, true)
            }
        };

    if confirmed {
        session.state = DialogueState::Confirmed;
        return TurnResult {
            confirmed: Some(true),
            ..reply(session, CONFIRMED_TEXT, vec![], true, fallback)
        };
    }

    if attempts >= MAX_CONFIRMATION_ATTEMPTS {
        tracing::info!(session_id = %session.id, attempts, "confirmation cycle exhausted");
        session.state = DialogueState::Collecting;
        session.last_question = CONFIRMATION_FAILED_TEXT.to_string();
        return TurnResult {
            confirmation_failed: Some(true),
            ..reply(session, CONFIRMATION_FAILED_TEXT, vec![], false, fallback)
        };
    }

    session.state = DialogueState::WaitingConfirmation {
        attempts: attempts + 1,
    };
    let text = confirmation_summary(&session.slots);
    session.last_question = text.clone();
    reply(session, &text, vec![], false, fallback)
}

pub fn confirmation_summary(slots: &SlotSet) -> String {
    let value = |key| slots.get(key).unwrap_or("-");
    format!(
        "Thank you! Here are your flight details:\n\n\
         From: {}\n\
         To: {}\n\
         Departure: {}\n\
         Return: {}\n\
         Budget: {}\n\n\
         Please confirm if everything is correct by replying 'yes' or 'confirm'.",
        value(SlotKey::Origin),
        value(SlotKey::Destination),
        value(SlotKey::DepartureDate),
        value(SlotKey::ReturnDate),
        value(SlotKey::Budget),
    )
}

fn reply(
    session: &Session,
    text: &str,
    missing_info: Vec<SlotKey>,
    complete: bool,
    fallback: bool,
) -> TurnResult {
    TurnResult {
        text: text.to_string(),
        slots: session.slots.clone(),
        missing_info,
        complete,
        confirmed: None,
        confirmation_failed: None,
        state: session.state,
        fallback,
    }
}
