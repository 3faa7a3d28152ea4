//! Conversation backend boundary.
//!
//! The controller talks to the remote conversation service through the
//! `ConversationBackend` trait. `HttpConversationBackend` is the HTTP+JSON
//! implementation; tests drive the controller with in-memory fakes.

pub mod client;
pub mod error;
pub mod wire;

pub use client::HttpConversationBackend;
pub use error::{BackendError, BackendResult, SEND_FAILED_MESSAGE};

use std::future::Future;
use std::pin::Pin;

use crate::session::types::{Conversation, ConversationId};

/// Boxed future type for backend operations.
pub type BackendFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A send, either starting a conversation or continuing one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendRequest {
    /// Start a conversation; the model is fixed from here on.
    NewConversation {
        /// First user message.
        prompt: String,
        /// Model to create the conversation with.
        model: String,
    },
    /// Append a message to an existing conversation.
    ContinueConversation {
        /// Conversation to append to.
        id: ConversationId,
        /// User message.
        prompt: String,
        /// Model the conversation was created with.
        model: String,
    },
}

impl SendRequest {
    /// Text of the user message.
    #[must_use]
    pub fn prompt(&self) -> &str {
        match self {
            Self::NewConversation { prompt, .. } | Self::ContinueConversation { prompt, .. } => {
                prompt
            }
        }
    }

    /// Target conversation, if it already exists.
    #[must_use]
    pub const fn conversation_id(&self) -> Option<&ConversationId> {
        match self {
            Self::NewConversation { .. } => None,
            Self::ContinueConversation { id, .. } => Some(id),
        }
    }
}

/// Remote conversation service.
pub trait ConversationBackend: Send + Sync {
    /// Create or continue a conversation and return the authoritative result.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    fn send(&self, request: SendRequest) -> BackendFuture<'_, BackendResult<Conversation>>;

    /// Delete a conversation.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    fn delete(&self, id: ConversationId) -> BackendFuture<'_, BackendResult<()>>;

    /// Fetch every conversation known to the backend.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    fn list(&self) -> BackendFuture<'_, BackendResult<Vec<Conversation>>>;
}
