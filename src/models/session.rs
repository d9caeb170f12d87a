use chrono::{DateTime, Utc};

use super::slots::SlotSet;

pub const GREETING: &str =
    "Hi! I'm the Fly Me assistant. Tell me your departure city, destination, dates, and max budget.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueState {
    Collecting,
    WaitingConfirmation { attempts: u8 },
    Confirmed,
}

impl DialogueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DialogueState::Collecting => "collecting",
            DialogueState::WaitingConfirmation { .. } => "waiting_confirmation",
            DialogueState::Confirmed => "confirmed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub slots: SlotSet,
    pub state: DialogueState,
    /// Most recent prompt shown to the user; fed back to the model as context.
    pub last_question: String,
    pub last_activity: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            slots: SlotSet::default(),
            state: DialogueState::Collecting,
            last_question: GREETING.to_string(),
            last_activity: Utc::now(),
        }
    }
}
