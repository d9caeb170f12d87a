use std::sync::Arc;

use chrono::Local;

use crate::models::TurnResult;
use crate::services::dialogue;
use crate::state::AppState;

/// Runs one turn of the booking dialogue for `session_id`, creating the
/// session on first contact. Concurrent calls for the same id are serialized.
pub async fn process_message(state: &Arc<AppState>, session_id: &str, text: &str) -> TurnResult {
    let (session, created) = state.sessions.get_or_create(session_id).await;
    if created {
        let active_sessions = state.sessions.len().await;
        tracing::info!(session_id, active_sessions, "session created");
    }

    let mut session = session.lock().await;
    let before = session.state;
    let today = Local::now().date_naive();

    let result = dialogue::run_turn(&mut session, state.llm.as_ref(), text, today).await;

    tracing::info!(
        session_id,
        from = before.as_str(),
        to = result.state.as_str(),
        missing = result.missing_info.len(),
        complete = result.complete,
        "turn processed"
    );

    result
}
