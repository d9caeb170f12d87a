use crate::config::AppConfig;
use crate::services::ai::LlmProvider;
use crate::services::sessions::SessionStore;

pub struct AppState {
    pub config: AppConfig,
    pub llm: Box<dyn LlmProvider>,
    pub sessions: SessionStore,
}
