//! Conversation session layer.
//!
//! - `types`: conversation, message and id types
//! - `store`: the in-memory registry of known conversations
//! - `controller`: send/delete orchestration, input buffer and error slot
//! - `display`: labels used when rendering conversations
//! - `error`: store and controller errors

pub mod controller;
pub mod display;
pub mod error;
pub mod store;
pub mod types;

pub use controller::{SendKey, SendOutcome, SessionController};
pub use error::{SessionError, SessionResult, StoreError, StoreResult};
pub use store::ConversationStore;
pub use types::{Conversation, ConversationId, Message, MessageRole};
