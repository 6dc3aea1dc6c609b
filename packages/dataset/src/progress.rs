//! Progress reporting for dataset loading.
//!
//! Loading a multi-million-row CSV takes long enough that the CLI shows a
//! progress bar. The loader only knows about [`ProgressCallback`]; the
//! rendering backend lives in the binary.

use std::sync::Arc;

/// Receives progress updates while a dataset is being read.
///
/// The total row count is not known until the file has been read, so
/// positions are rows parsed so far.
pub trait ProgressCallback: Send + Sync {
    /// Set the current position (absolute, not delta).
    fn set_position(&self, pos: u64);

    /// Update the message displayed alongside the progress indicator.
    fn set_message(&self, msg: String);

    /// Mark progress as complete with a final message.
    fn finish(&self, msg: String);
}

/// A no-op [`ProgressCallback`].
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_position(&self, _pos: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`] instance for convenient use.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
