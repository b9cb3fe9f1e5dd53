use std::io;
use std::thread::Builder;

use super::{Job, Spawner};
use crate::config::NotifierConfig;

/// Spawns one OS thread per job. The thread is detached.
///
/// A panic in a job unwinds only its own thread.
#[derive(Debug, Clone)]
pub struct ThreadSpawner {
    thread_name: String,
    stack_size: Option<usize>,
}

impl ThreadSpawner {
    pub fn new(config: &NotifierConfig) -> Self {
        Self {
            thread_name: config.thread_name.clone(),
            stack_size: config.stack_size,
        }
    }
}

impl Default for ThreadSpawner {
    fn default() -> Self {
        Self::new(&NotifierConfig::default())
    }
}

impl Spawner for ThreadSpawner {
    fn spawn(&self, job: Job) -> io::Result<()> {
        // Builder::spawn panics on interior NUL instead of returning an error.
        if self.thread_name.contains('\0') {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "thread name contains a NUL byte",
            ));
        }
        let mut builder = Builder::new().name(self.thread_name.clone());
        if let Some(size) = self.stack_size {
            builder = builder.stack_size(size);
        }
        builder.spawn(job).map(drop)
    }
}
