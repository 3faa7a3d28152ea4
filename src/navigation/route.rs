//! External addressing of conversations.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::session::types::ConversationId;

/// Path prefix for a single conversation.
pub const CONVERSATION_PATH_PREFIX: &str = "/conversation/";

/// Path for "no conversation selected".
pub const HOME_PATH: &str = "/";

/// Where the addressing mechanism currently points.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Route {
    /// Blank conversation, nothing selected.
    #[default]
    Home,
    /// A specific conversation.
    Conversation(ConversationId),
}

impl Route {
    /// Route addressing the given conversation.
    #[must_use]
    pub const fn conversation(id: ConversationId) -> Self {
        Self::Conversation(id)
    }

    /// Conversation id carried by the route, if any.
    #[must_use]
    pub const fn conversation_id(&self) -> Option<&ConversationId> {
        match self {
            Self::Home => None,
            Self::Conversation(id) => Some(id),
        }
    }

    /// Path form of the route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => HOME_PATH.to_string(),
            Self::Conversation(id) => format!("{CONVERSATION_PATH_PREFIX}{id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Error returned when a path does not map to a route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown route: {0}")]
pub struct RouteParseError(pub String);

impl FromStr for Route {
    type Err = RouteParseError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let path = path.trim();
        if path.is_empty() || path == HOME_PATH {
            return Ok(Self::Home);
        }

        let Some(rest) = path.strip_prefix(CONVERSATION_PATH_PREFIX) else {
            return Err(RouteParseError(path.to_string()));
        };
        let segment = rest.trim_end_matches('/');
        if segment.is_empty() {
            return Ok(Self::Home);
        }
        if segment.contains('/') {
            return Err(RouteParseError(path.to_string()));
        }

        Ok(Self::Conversation(ConversationId::from(segment)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_format() {
        assert_eq!(Route::Home.path(), "/");
        assert_eq!(
            Route::conversation(ConversationId::from("abc")).path(),
            "/conversation/abc"
        );
    }

    #[test]
    fn test_parse_paths() {
        assert_eq!("/".parse::<Route>(), Ok(Route::Home));
        assert_eq!("".parse::<Route>(), Ok(Route::Home));
        assert_eq!("/conversation/".parse::<Route>(), Ok(Route::Home));
        assert_eq!(
            "/conversation/abc/".parse::<Route>(),
            Ok(Route::Conversation(ConversationId::from("abc")))
        );
        assert!("/settings".parse::<Route>().is_err());
        assert!("/conversation/a/b".parse::<Route>().is_err());
    }

    #[test]
    fn test_conversation_id_accessor() {
        let route = Route::conversation(ConversationId::from("x"));
        assert_eq!(route.conversation_id().map(ConversationId::as_str), Some("x"));
        assert!(Route::Home.conversation_id().is_none());
    }
}
