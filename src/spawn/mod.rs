//! Scheduling of handler chains.
//!
//! `publish` hands every assembled chain to a [`Spawner`] as one [`Job`].
//! Spawners must run each job as its own independently scheduled unit and
//! must not wait for it.

mod thread;
#[cfg(feature = "tokio")]
mod tokio_runtime;

pub use self::thread::ThreadSpawner;
#[cfg(feature = "tokio")]
pub use self::tokio_runtime::TokioSpawner;

use std::io;

/// One handler chain, ready to run.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs jobs concurrently, fire-and-forget.
pub trait Spawner: Send + Sync {
    /// Schedule `job`. Returns once it is scheduled, not once it has run.
    fn spawn(&self, job: Job) -> io::Result<()>;
}
