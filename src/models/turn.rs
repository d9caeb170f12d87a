use super::session::DialogueState;
use super::slots::{SlotKey, SlotSet};

/// Outcome of a single dialogue turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnResult {
    pub text: String,
    pub slots: SlotSet,
    pub missing_info: Vec<SlotKey>,
    pub complete: bool,
    pub confirmed: Option<bool>,
    pub confirmation_failed: Option<bool>,
    pub state: DialogueState,
    /// Set when the model's output was unusable and a canned reply was used.
    pub fallback: bool,
}
