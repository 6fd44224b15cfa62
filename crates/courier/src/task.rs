//! Thin wrapper around the runtime's spawn

use std::future::Future;

use tokio::runtime::{Handle, TryCurrentError};
use tokio::task::JoinHandle;

/// Handle of the Tokio runtime the caller is running on
pub fn current() -> Result<Handle, TryCurrentError> {
    Handle::try_current()
}

/// Spawns a new asynchronous task on `runtime`
pub fn spawn_on<F>(runtime: &Handle, future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    runtime.spawn(future)
}
