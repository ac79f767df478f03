//! Client-side state stores.
//!
//! Each store owns its in-memory collection, talks to the server through
//! a shared [`crate::client::ApiClient`], catches failures at its own
//! boundary (logging them) and reports plain `bool` / [`SubmitOutcome`]
//! results. After every reconciliation a [`StoreEvent`] is published.
//!
//! Every store holds a [`CancellationToken`]. Once it is cancelled
//! (see `close`), outstanding calls stop being awaited and their results
//! are never applied.

pub mod auth;
pub mod event_bus;
pub mod feed;
pub mod reports;
pub mod store_event;

use std::future::Future;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio_util::sync::CancellationToken;

pub use auth::{AuthState, AuthStore};
pub use event_bus::EventBus;
pub use feed::FeedStore;
pub use reports::ReportStore;
pub use store_event::StoreEvent;

/// Result of a submission (report or cleanup verification).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// Whether the server accepted the submission.
    pub success: bool,
    /// Eco points the server credited, when it succeeded.
    pub points_earned: Option<i64>,
}

impl SubmitOutcome {
    /// Accepted submission crediting `points`.
    #[must_use]
    pub const fn succeeded(points: i64) -> Self {
        Self {
            success: true,
            points_earned: Some(points),
        }
    }

    /// Rejected submission.
    #[must_use]
    pub const fn failed() -> Self {
        Self {
            success: false,
            points_earned: None,
        }
    }
}

/// Awaits `fut` unless `cancel` fires first, in which case `None` is
/// returned and the future is dropped.
pub(crate) async fn until_cancelled<F: Future>(
    cancel: &CancellationToken,
    fut: F,
) -> Option<F::Output> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => None,
        output = fut => Some(output),
    }
}

pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
