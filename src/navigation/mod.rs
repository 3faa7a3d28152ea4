//! Navigation between conversations.
//!
//! - `route`: path form of "which conversation is addressed"
//! - `binder`: resolves the displayed conversation and requests route switches

pub mod binder;
pub mod route;

pub use binder::{HistoryNavigator, NavigationBinder, Navigator};
pub use route::{Route, RouteParseError};
