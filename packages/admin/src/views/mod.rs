//! Admin list screens as plain state machines.
//!
//! A view owns its state and talks to the API through a small trait, so the
//! same logic drives the CLI and the tests.

pub mod actors;
pub mod movies;
mod pager;
mod search;

pub use actors::{ActorApi, ActorListView};
pub use movies::{MovieApi, MovieListView};
pub use pager::Pager;
pub use search::SearchState;

/// Default page size of the admin lists.
pub const PAGE_LIMIT: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Error,
    Success,
}

/// A message a view wants shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
}

impl Notification {
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            text: text.into(),
        }
    }
}
