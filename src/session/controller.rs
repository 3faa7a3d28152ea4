//! Orchestration of send and delete operations.
//!
//! The controller owns the input buffer and the single user-visible error
//! slot. It routes a send to create or update depending on whether a
//! conversation id is known, and reconciles the authoritative backend result
//! into the store before asking the binder to navigate.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use dashmap::DashSet;
use tracing::{debug, error, info, warn};

use super::error::{SessionError, SessionResult, StoreError};
use super::store::ConversationStore;
use super::types::{Conversation, ConversationId};
use crate::backend::{ConversationBackend, SendRequest};
use crate::navigation::NavigationBinder;

/// Unit of mutual exclusion for sends.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SendKey {
    /// The conversation being started, which has no id yet.
    Draft,
    /// An existing conversation.
    Conversation(ConversationId),
}

impl SendKey {
    /// Key for a send addressed to `id` (or to a new conversation).
    #[must_use]
    pub fn for_target(id: Option<&ConversationId>) -> Self {
        id.map_or(Self::Draft, |id| Self::Conversation(id.clone()))
    }
}

impl fmt::Display for SendKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => f.write_str("new conversation"),
            Self::Conversation(id) => write!(f, "conversation {id}"),
        }
    }
}

/// Result of a send that did not fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// The prompt was blank; nothing was sent.
    Skipped,
    /// A conversation was created, stored and navigated to.
    Created(Arc<Conversation>),
    /// An existing conversation was replaced by the backend's version.
    Updated(Arc<Conversation>),
    /// The backend succeeded but the store rejected the result.
    Discarded(StoreError),
}

/// Marks a key as in flight until dropped.
struct InFlightGuard<'a> {
    in_flight: &'a DashSet<SendKey>,
    key: SendKey,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(in_flight: &'a DashSet<SendKey>, key: SendKey) -> SessionResult<Self> {
        if !in_flight.insert(key.clone()) {
            return Err(SessionError::Busy(key));
        }
        Ok(Self { in_flight, key })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.remove(&self.key);
    }
}

/// Mediates between the input buffer, the backend, the store and navigation.
pub struct SessionController {
    backend: Arc<dyn ConversationBackend>,
    store: Arc<ConversationStore>,
    binder: NavigationBinder,
    default_model: String,
    in_flight: DashSet<SendKey>,
    input: RwLock<String>,
    error: RwLock<Option<String>>,
}

impl SessionController {
    /// Create a controller.
    #[must_use]
    pub fn new(
        backend: Arc<dyn ConversationBackend>,
        store: Arc<ConversationStore>,
        binder: NavigationBinder,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            store,
            binder,
            default_model: default_model.into(),
            in_flight: DashSet::new(),
            input: RwLock::new(String::new()),
            error: RwLock::new(None),
        }
    }

    /// Conversation registry.
    #[must_use]
    pub const fn store(&self) -> &Arc<ConversationStore> {
        &self.store
    }

    /// Navigation binder.
    #[must_use]
    pub const fn binder(&self) -> &NavigationBinder {
        &self.binder
    }

    /// Conversation currently displayed.
    #[must_use]
    pub fn displayed(&self) -> Option<Arc<Conversation>> {
        self.binder.displayed()
    }

    /// Current contents of the input buffer.
    #[must_use]
    pub fn input(&self) -> String {
        self.input
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the contents of the input buffer.
    pub fn set_input(&self, text: impl Into<String>) {
        *self.input.write().unwrap_or_else(PoisonError::into_inner) = text.into();
    }

    /// Clear the buffer unless it was edited while the send was in flight.
    fn clear_input_if(&self, sent: &str) {
        let mut input = self.input.write().unwrap_or_else(PoisonError::into_inner);
        if input.as_str() == sent {
            input.clear();
        }
    }

    /// Message in the user-visible error slot.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clear the error slot.
    pub fn dismiss_error(&self) {
        *self.error.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn set_error(&self, message: String) {
        *self.error.write().unwrap_or_else(PoisonError::into_inner) = Some(message);
    }

    /// Whether a send for `key` is outstanding.
    #[must_use]
    pub fn is_in_flight(&self, key: &SendKey) -> bool {
        self.in_flight.contains(key)
    }

    /// Whether a send for the displayed route is outstanding.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.is_in_flight(&SendKey::for_target(self.binder.active_id().as_ref()))
    }

    /// Send the input buffer to the conversation addressed by the current route.
    ///
    /// # Errors
    /// See [`SessionController::send_message`].
    pub async fn submit(&self, model_hint: Option<&str>) -> SessionResult<SendOutcome> {
        let prompt = self.input();
        let active_id = self.binder.active_id();
        self.send_message(active_id, &prompt, model_hint).await
    }

    /// Send a prompt, creating a conversation when `active_id` is `None`.
    ///
    /// `model_hint` only applies on creation; a follow-up carries the model
    /// the conversation was created with. On success the input buffer is
    /// cleared if it still holds `prompt`; on failure it is left untouched and
    /// the error slot is set.
    ///
    /// # Errors
    /// Returns `Busy` if a send for the same conversation is outstanding and
    /// `RequestFailed` if the backend call fails.
    pub async fn send_message(
        &self,
        active_id: Option<ConversationId>,
        prompt: &str,
        model_hint: Option<&str>,
    ) -> SessionResult<SendOutcome> {
        if prompt.trim().is_empty() {
            debug!("Ignoring blank prompt");
            return Ok(SendOutcome::Skipped);
        }

        let _guard = InFlightGuard::acquire(
            &self.in_flight,
            SendKey::for_target(active_id.as_ref()),
        )?;
        self.dismiss_error();

        let request = match active_id {
            Some(id) => SendRequest::ContinueConversation {
                model: self.conversation_model(&id),
                id,
                prompt: prompt.to_string(),
            },
            None => SendRequest::NewConversation {
                prompt: prompt.to_string(),
                model: self.pick_model(model_hint),
            },
        };
        let is_new = request.conversation_id().is_none();

        let conversation = match self.backend.send(request).await {
            Ok(conversation) => conversation,
            Err(err) => {
                error!("Error sending message: {err}");
                let message = err.user_message();
                self.set_error(message.clone());
                return Err(SessionError::RequestFailed(message));
            }
        };

        let outcome = if is_new {
            self.adopt_created(conversation)
        } else {
            self.adopt_updated(conversation)
        };

        if !matches!(outcome, SendOutcome::Discarded(_)) {
            self.clear_input_if(prompt);
        }
        Ok(outcome)
    }

    fn conversation_model(&self, id: &ConversationId) -> String {
        self.store
            .get(id)
            .ok()
            .and_then(|conversation| conversation.model.clone())
            .unwrap_or_else(|| self.default_model.clone())
    }

    fn pick_model(&self, model_hint: Option<&str>) -> String {
        model_hint
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(self.default_model.as_str())
            .to_string()
    }

    fn adopt_created(&self, conversation: Conversation) -> SendOutcome {
        match self.store.add(conversation) {
            Ok(entry) => {
                self.binder.goto_conversation(&entry.id);
                info!("Started conversation {}", entry.id);
                SendOutcome::Created(entry)
            }
            Err(err) => {
                warn!("Discarding created conversation: {err}");
                SendOutcome::Discarded(err)
            }
        }
    }

    fn adopt_updated(&self, conversation: Conversation) -> SendOutcome {
        match self.store.replace(conversation) {
            Ok(entry) => SendOutcome::Updated(entry),
            Err(err) => {
                warn!("Discarding update for a conversation that is gone: {err}");
                SendOutcome::Discarded(err)
            }
        }
    }

    /// Delete a conversation on the backend and forget it locally.
    ///
    /// Navigates home if the deleted conversation was displayed. Failures do
    /// not touch the error slot or the displayed conversation.
    ///
    /// # Errors
    /// Returns `DeleteFailed` if the backend call fails.
    pub async fn delete_conversation(&self, id: &ConversationId) -> SessionResult<()> {
        if let Err(err) = self.backend.delete(id.clone()).await {
            error!("Error deleting conversation {id}: {err}");
            return Err(SessionError::DeleteFailed(err.to_string()));
        }

        if let Err(err) = self.store.remove(id) {
            warn!("Deleted conversation was not in the store: {err}");
        }

        if self.binder.active_id().as_ref() == Some(id) {
            self.binder.goto_home();
        }
        Ok(())
    }

    /// Fetch the conversation list and load it into the store.
    ///
    /// Returns the number of newly registered conversations.
    ///
    /// # Errors
    /// Returns `LoadFailed` if the backend call fails.
    pub async fn refresh(&self) -> SessionResult<usize> {
        let conversations = self.backend.list().await.map_err(|err| {
            error!("Error loading conversations: {err}");
            SessionError::LoadFailed(err.to_string())
        })?;
        let inserted = self.store.load(conversations);
        debug!("Loaded {inserted} conversations");
        Ok(inserted)
    }

    /// Display a known conversation.
    ///
    /// An unknown id leaves the route untouched and returns `None`.
    #[must_use]
    pub fn open_conversation(&self, id: &ConversationId) -> Option<Arc<Conversation>> {
        let conversation = self.store.get(id).ok()?;
        self.binder.goto_conversation(id);
        Some(conversation)
    }

    /// Switch to a blank conversation.
    pub fn new_conversation(&self) {
        self.binder.goto_home();
    }
}
