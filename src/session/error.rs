//! Error types for the conversation session layer.

use thiserror::Error;

use super::types::ConversationId;
use super::controller::SendKey;

/// Store invariant violations.
///
/// These are race or programming conditions, never shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A conversation with this id is already registered.
    #[error("conversation {0} already exists")]
    DuplicateId(ConversationId),
    /// No conversation with this id is registered.
    #[error("conversation {0} not found")]
    NotFound(ConversationId),
}

/// Convenience result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the session controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The backend request failed; the message is user-facing.
    #[error("{0}")]
    RequestFailed(String),
    /// A send for the same conversation is still outstanding.
    #[error("a message is already being sent for {0}")]
    Busy(SendKey),
    /// Deleting a conversation failed on the backend.
    #[error("failed to delete conversation: {0}")]
    DeleteFailed(String),
    /// Loading the conversation list failed.
    #[error("failed to load conversations: {0}")]
    LoadFailed(String),
}

/// Convenience result alias for controller operations.
pub type SessionResult<T> = Result<T, SessionError>;
