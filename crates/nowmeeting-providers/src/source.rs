//! The [`MeetingSource`] trait.

use std::future::Future;
use std::pin::Pin;

use nowmeeting_core::MeetingRecord;

use crate::error::ProviderResult;

/// A boxed future for async trait methods.
///
/// Boxed futures keep the trait object-safe so the client can hold a
/// `Box<dyn MeetingSource>` chosen at runtime.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Anything that produces the weekly meeting list.
///
/// Sources return records as they found them. Filtering by time and ordering
/// happen later in `nowmeeting_core`, so a source never drops a record just
/// because one of its fields is malformed.
pub trait MeetingSource: Send + Sync {
    /// Short name used in logs and error messages (e.g. "file", "bmlt").
    fn name(&self) -> &str;

    /// Loads every known meeting.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` when the underlying data cannot be read or
    /// decoded at all.
    fn fetch(&self) -> BoxFuture<'_, ProviderResult<Vec<MeetingRecord>>>;
}
