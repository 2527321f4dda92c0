//! Progress reporting for the startup data load.
//!
//! The loader reports one unit of work per data file. Rendering is left to
//! the caller: the CLI plugs in an `indicatif` bar, tests and library users
//! pass [`null_progress`].

use std::sync::Arc;

/// Receives progress updates while the data files load.
pub trait ProgressCallback: Send + Sync {
    /// Sets the number of files in the batch.
    fn set_total(&self, total: u64);

    /// Advances by `delta` files.
    fn inc(&self, delta: u64);

    /// Updates the message shown next to the indicator.
    fn set_message(&self, msg: String);

    /// Marks the batch complete with a final message.
    fn finish(&self, msg: String);
}

/// A [`ProgressCallback`] that ignores every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`].
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
