//! In-memory conversation registry.
//!
//! The store is the single source of truth for every conversation known to the
//! session. Entries are shared as `Arc<Conversation>`: replacing an entry swaps
//! the shared value, so anyone resolving "the conversation with this id" through
//! the store observes the replacement immediately.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use super::error::{StoreError, StoreResult};
use super::types::{Conversation, ConversationId};

/// Session-lifetime registry of conversations, ordered by insertion.
#[derive(Debug, Default)]
pub struct ConversationStore {
    entries: RwLock<Vec<Arc<Conversation>>>,
}

impl ConversationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with conversations, skipping duplicate ids.
    #[must_use]
    pub fn with_conversations(conversations: impl IntoIterator<Item = Conversation>) -> Self {
        let store = Self::new();
        store.load(conversations);
        store
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Arc<Conversation>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Arc<Conversation>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a new conversation at the end of the list.
    ///
    /// # Errors
    /// Returns `DuplicateId` if a conversation with the same id exists.
    pub fn add(&self, conversation: Conversation) -> StoreResult<Arc<Conversation>> {
        let mut entries = self.write();
        if entries.iter().any(|c| c.id == conversation.id) {
            return Err(StoreError::DuplicateId(conversation.id));
        }

        let entry = Arc::new(conversation);
        entries.push(Arc::clone(&entry));
        debug!("Added conversation {}", entry.id);
        Ok(entry)
    }

    /// Overwrite the conversation with the same id, keeping its position.
    ///
    /// # Errors
    /// Returns `NotFound` if no conversation with that id exists.
    pub fn replace(&self, conversation: Conversation) -> StoreResult<Arc<Conversation>> {
        let mut entries = self.write();
        let Some(slot) = entries.iter_mut().find(|c| c.id == conversation.id) else {
            return Err(StoreError::NotFound(conversation.id));
        };

        let entry = Arc::new(conversation);
        *slot = Arc::clone(&entry);
        debug!("Replaced conversation {}", entry.id);
        Ok(entry)
    }

    /// Remove a conversation and return it.
    ///
    /// # Errors
    /// Returns `NotFound` if no conversation with that id exists.
    pub fn remove(&self, id: &ConversationId) -> StoreResult<Arc<Conversation>> {
        let mut entries = self.write();
        let Some(index) = entries.iter().position(|c| &c.id == id) else {
            return Err(StoreError::NotFound(id.clone()));
        };

        let removed = entries.remove(index);
        debug!("Removed conversation {id}");
        Ok(removed)
    }

    /// Look up a conversation by id.
    ///
    /// # Errors
    /// Returns `NotFound` if no conversation with that id exists.
    pub fn get(&self, id: &ConversationId) -> StoreResult<Arc<Conversation>> {
        self.read()
            .iter()
            .find(|c| &c.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Check whether a conversation is registered.
    #[must_use]
    pub fn contains(&self, id: &ConversationId) -> bool {
        self.read().iter().any(|c| &c.id == id)
    }

    /// Snapshot of all conversations in insertion order.
    #[must_use]
    pub fn list(&self) -> Vec<Arc<Conversation>> {
        self.read().clone()
    }

    /// Number of registered conversations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Bootstrap the store from a pre-fetched list.
    ///
    /// Conversations whose id is already known are skipped. Returns the number
    /// of conversations actually inserted.
    pub fn load(&self, conversations: impl IntoIterator<Item = Conversation>) -> usize {
        let mut inserted = 0;
        for conversation in conversations {
            match self.add(conversation) {
                Ok(_) => inserted += 1,
                Err(err) => warn!("Skipping conversation during load: {err}"),
            }
        }
        inserted
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::session::types::{Message, MessageRole};

    fn conversation(id: &str, title: &str) -> Conversation {
        Conversation {
            id: ConversationId::from(id),
            title: Some(title.to_string()),
            start_time: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
            model: Some("gemini-1.5-flash-8b".to_string()),
            messages: vec![Message {
                id: format!("{id}-m1"),
                role: MessageRole::User,
                content: "hello".to_string(),
                created_at: None,
            }],
        }
    }

    #[test]
    fn test_add_then_get_returns_equal_value() {
        let store = ConversationStore::new();
        let original = conversation("a", "First");
        store.add(original.clone()).expect("add");

        let fetched = store.get(&ConversationId::from("a")).expect("get");
        assert_eq!(*fetched, original);
    }

    #[test]
    fn test_add_duplicate_fails() {
        let store = ConversationStore::new();
        store.add(conversation("a", "First")).expect("add");

        let err = store.add(conversation("a", "Again")).unwrap_err();
        assert_eq!(err, StoreError::DuplicateId(ConversationId::from("a")));
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get(&ConversationId::from("a")).unwrap().title.as_deref(),
            Some("First")
        );
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let store = ConversationStore::new();
        store.add(conversation("a", "A")).unwrap();
        store.add(conversation("b", "B")).unwrap();
        store.add(conversation("c", "C")).unwrap();

        let ids: Vec<_> = store.list().iter().map(|c| c.id.to_string()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn test_replace_keeps_position_and_swaps_value() {
        let store = ConversationStore::new();
        store.add(conversation("a", "A")).unwrap();
        store.add(conversation("b", "B")).unwrap();

        let mut updated = conversation("a", "A renamed");
        updated.messages.push(Message {
            id: "a-m2".to_string(),
            role: MessageRole::Assistant,
            content: "hi there".to_string(),
            created_at: None,
        });
        let entry = store.replace(updated.clone()).expect("replace");

        let list = store.list();
        assert_eq!(list[0].id.as_str(), "a");
        assert!(Arc::ptr_eq(&list[0], &entry));
        assert_eq!(*store.get(&ConversationId::from("a")).unwrap(), updated);
    }

    #[test]
    fn test_replace_missing_fails() {
        let store = ConversationStore::new();
        let err = store.replace(conversation("ghost", "Ghost")).unwrap_err();
        assert_eq!(err, StoreError::NotFound(ConversationId::from("ghost")));
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove() {
        let store = ConversationStore::new();
        store.add(conversation("a", "A")).unwrap();
        store.add(conversation("b", "B")).unwrap();

        let removed = store.remove(&ConversationId::from("a")).expect("remove");
        assert_eq!(removed.id.as_str(), "a");
        assert!(!store.contains(&ConversationId::from("a")));
        assert!(store.contains(&ConversationId::from("b")));

        let err = store.remove(&ConversationId::from("a")).unwrap_err();
        assert_eq!(err, StoreError::NotFound(ConversationId::from("a")));
    }

    #[test]
    fn test_load_skips_duplicates() {
        let store = ConversationStore::with_conversations(vec![
            conversation("a", "A"),
            conversation("b", "B"),
        ]);
        let inserted = store.load(vec![conversation("b", "B2"), conversation("c", "C")]);

        assert_eq!(inserted, 1);
        assert_eq!(store.len(), 3);
        assert_eq!(
            store.get(&ConversationId::from("b")).unwrap().title.as_deref(),
            Some("B")
        );
    }
}
