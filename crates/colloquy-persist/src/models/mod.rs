pub mod conversation;
pub mod turn;

pub use conversation::Conversation;
pub use turn::{Turn, TurnRole};
