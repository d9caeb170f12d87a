pub mod session;
pub mod slots;
pub mod turn;

pub use session::{DialogueState, Session, GREETING};
pub use slots::{SlotKey, SlotSet};
pub use turn::TurnResult;
