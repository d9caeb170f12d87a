pub mod ai;
pub mod conversation;
pub mod dialogue;
pub mod prompts;
pub mod redact;
pub mod sessions;
