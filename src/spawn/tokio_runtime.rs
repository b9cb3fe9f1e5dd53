use std::io;

use tokio::runtime::Handle;

use super::{Job, Spawner};

/// Runs each job on a tokio runtime's blocking pool.
///
/// Chains are synchronous, so they go through `spawn_blocking` rather than
/// occupying async worker threads.
#[derive(Debug, Clone)]
pub struct TokioSpawner {
    handle: Handle,
}

impl TokioSpawner {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Spawner for the runtime the caller is running in, if any.
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl Spawner for TokioSpawner {
    fn spawn(&self, job: Job) -> io::Result<()> {
        drop(self.handle.spawn_blocking(job));
        Ok(())
    }
}
