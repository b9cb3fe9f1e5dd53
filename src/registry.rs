//! Type-keyed handler lists and the global middleware list.
//!
//! All state sits behind a single `RwLock`: registration takes the write
//! lock for the whole append, lookups take the read lock and clone out a
//! [`Snapshot`] so the lock is released before anything runs.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::context::ChainFn;
use crate::error::NotifierError;
use crate::key::TypeKey;

#[derive(Default)]
struct Inner {
    handlers: HashMap<TypeKey, Vec<ChainFn>>,
    middlewares: Vec<ChainFn>,
}

/// Handlers for one key plus the middlewares, as of one lookup.
#[derive(Clone)]
pub struct Snapshot {
    pub handlers: Vec<ChainFn>,
    pub middlewares: Vec<ChainFn>,
}

impl Snapshot {
    /// Chain for one handler: every middleware, then the handler.
    pub fn chain_for(&self, handler: &ChainFn) -> Vec<ChainFn> {
        let mut chain = Vec::with_capacity(self.middlewares.len() + 1);
        chain.extend(self.middlewares.iter().cloned());
        chain.push(Arc::clone(handler));
        chain
    }
}

/// Append-only registry shared by clones.
///
/// Middlewares are global: each one runs in front of every handler of every
/// key.
#[derive(Clone, Default)]
pub struct Registry {
    inner: Arc<RwLock<Inner>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // No user code runs under the lock and every write is a single push, so
    // a poisoned lock still guards consistent lists.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a handler under `key`. Returns the new handler count for `key`.
    pub fn add_handler(
        &self,
        key: TypeKey,
        handler: Option<ChainFn>,
    ) -> Result<usize, NotifierError> {
        let handler = handler.ok_or(NotifierError::InvalidArgument("handler cannot be None"))?;
        let mut inner = self.write();
        let handlers = inner.handlers.entry(key).or_default();
        handlers.push(handler);
        Ok(handlers.len())
    }

    /// Append a global middleware. Returns the new middleware count.
    pub fn add_middleware(&self, middleware: Option<ChainFn>) -> Result<usize, NotifierError> {
        let middleware =
            middleware.ok_or(NotifierError::InvalidArgument("middleware cannot be None"))?;
        let mut inner = self.write();
        inner.middlewares.push(middleware);
        Ok(inner.middlewares.len())
    }

    /// Current handlers for `key` and the middlewares, or `None` if nothing
    /// was ever registered for `key`.
    pub fn snapshot(&self, key: &TypeKey) -> Option<Snapshot> {
        let inner = self.read();
        let handlers = inner.handlers.get(key)?;
        Some(Snapshot {
            handlers: handlers.clone(),
            middlewares: inner.middlewares.clone(),
        })
    }

    pub fn handler_count(&self, key: &TypeKey) -> usize {
        self.read().handlers.get(key).map_or(0, Vec::len)
    }

    pub fn middleware_count(&self) -> usize {
        self.read().middlewares.len()
    }

    /// Keys that have at least one handler.
    pub fn keys(&self) -> Vec<TypeKey> {
        self.read().handlers.keys().copied().collect()
    }
}
