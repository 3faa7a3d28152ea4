//! Binding between the current route and the displayed conversation.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use super::route::Route;
use crate::session::store::ConversationStore;
use crate::session::types::{Conversation, ConversationId};

/// External addressing mechanism (a router, a URL bar, a terminal prompt).
pub trait Navigator: Send + Sync {
    /// Route currently pointed at.
    fn current(&self) -> Route;

    /// Point at a new route.
    fn navigate(&self, route: Route);
}

/// Routes kept by [`HistoryNavigator`]; older entries are dropped.
pub const HISTORY_LIMIT: usize = 32;

/// In-memory navigator keeping a bounded history stack.
#[derive(Debug)]
pub struct HistoryNavigator {
    history: RwLock<Vec<Route>>,
}

impl Default for HistoryNavigator {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl HistoryNavigator {
    /// Create a navigator starting at `initial`.
    #[must_use]
    pub fn new(initial: Route) -> Self {
        Self {
            history: RwLock::new(vec![initial]),
        }
    }

    /// Most recent routes visited, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<Route> {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for HistoryNavigator {
    fn current(&self) -> Route {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
            .unwrap_or_default()
    }

    fn navigate(&self, route: Route) {
        let mut history = self.history.write().unwrap_or_else(PoisonError::into_inner);
        history.push(route);
        if history.len() > HISTORY_LIMIT {
            let excess = history.len() - HISTORY_LIMIT;
            history.drain(..excess);
        }
    }
}

/// Resolves the displayed conversation from the current route.
///
/// The binder never keeps a copy of a conversation: it always dereferences the
/// store, so the displayed view and the list entry cannot drift apart.
#[derive(Clone)]
pub struct NavigationBinder {
    store: Arc<ConversationStore>,
    navigator: Arc<dyn Navigator>,
}

impl NavigationBinder {
    /// Create a binder over a store and a navigator.
    #[must_use]
    pub const fn new(store: Arc<ConversationStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }

    /// Find the conversation addressed by `id`.
    ///
    /// An absent or unknown id yields `None`, which stands for a blank
    /// conversation rather than an error.
    #[must_use]
    pub fn resolve(
        id: Option<&ConversationId>,
        conversations: &ConversationStore,
    ) -> Option<Arc<Conversation>> {
        id.and_then(|id| conversations.get(id).ok())
    }

    /// Route currently pointed at.
    #[must_use]
    pub fn current_route(&self) -> Route {
        self.navigator.current()
    }

    /// Id of the conversation currently addressed, if any.
    #[must_use]
    pub fn active_id(&self) -> Option<ConversationId> {
        match self.navigator.current() {
            Route::Home => None,
            Route::Conversation(id) => Some(id),
        }
    }

    /// Conversation currently displayed.
    #[must_use]
    pub fn displayed(&self) -> Option<Arc<Conversation>> {
        Self::resolve(self.active_id().as_ref(), &self.store)
    }

    /// Point at a conversation; does nothing if already there.
    pub fn goto_conversation(&self, id: &ConversationId) {
        let route = Route::conversation(id.clone());
        if self.navigator.current() == route {
            return;
        }
        debug!("Navigating to {route}");
        self.navigator.navigate(route);
    }

    /// Point at "no conversation selected"; does nothing if already there.
    pub fn goto_home(&self) {
        if self.navigator.current() == Route::Home {
            return;
        }
        debug!("Navigating home");
        self.navigator.navigate(Route::Home);
    }
}
