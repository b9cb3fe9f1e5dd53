//! Execution context and the chain advancement protocol.
//!
//! A context is built fresh for every (handler, publish) pair. Its chain is
//! the registered middlewares followed by exactly one handler:
//!
//! ```text
//!   cursor: -1        0              1              2
//!           │   ┌───────────┐  ┌───────────┐  ┌──────────┐
//!   next() ─┴──►│ middleware├─►│ middleware├─►│ handler  │
//!               └───────────┘  └───────────┘  └──────────┘
//!                 next()         next()         next() is a no-op
//! ```
//!
//! Each member decides whether the chain continues by calling
//! [`ExecutionContext::next`] before it returns. Returning without calling
//! it short-circuits everything after it.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::key::TypeKey;

/// A chain member: a middleware, or a handler wrapped by the registry.
pub type ChainFn = Arc<dyn Fn(&mut ExecutionContext) + Send + Sync>;

/// Per-invocation state: the published value, the chain, and a cursor.
///
/// The parameter is owned by this context. Values with reference semantics
/// (`Arc<Mutex<_>>`, atomics, channels) are still shared with the other
/// contexts spawned by the same publish; synchronising them is up to the
/// caller.
pub struct ExecutionContext {
    parameter: Box<dyn Any + Send>,
    key: TypeKey,
    chain: Vec<ChainFn>,
    cursor: isize,
}

impl ExecutionContext {
    /// Create a context in its initial state (cursor at -1).
    pub fn new<T: Any + Send>(parameter: T, chain: Vec<ChainFn>) -> Self {
        Self {
            parameter: Box::new(parameter),
            key: TypeKey::of::<T>(),
            chain,
            cursor: -1,
        }
    }

    /// Advance to the next chain member and run it.
    ///
    /// Past the end of the chain (or on an empty chain) this does nothing
    /// and the cursor is left where it was.
    pub fn next(&mut self) {
        let position = self.cursor + 1;
        let link = match usize::try_from(position)
            .ok()
            .and_then(|index| self.chain.get(index))
        {
            Some(link) => Arc::clone(link),
            None => return,
        };
        self.cursor = position;
        link(self);
    }

    /// Borrow the parameter as `T`, or `None` if it has another type.
    pub fn parameter<T: Any>(&self) -> Option<&T> {
        self.parameter.downcast_ref::<T>()
    }

    /// Mutably borrow the parameter as `T`.
    ///
    /// Mutation only changes this context's copy. The dynamic type can never
    /// change, which is what keeps the handler downcast infallible.
    pub fn parameter_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.parameter.downcast_mut::<T>()
    }

    /// Key of the parameter's concrete type.
    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn type_name(&self) -> &'static str {
        self.key.name()
    }

    /// Index of the member currently running, or -1 before the first `next`.
    pub fn cursor(&self) -> isize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// True once the last member has been reached.
    pub fn is_exhausted(&self) -> bool {
        self.cursor + 1 >= self.chain.len() as isize
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("parameter", &self.key)
            .field("chain_len", &self.chain.len())
            .field("cursor", &self.cursor)
            .finish()
    }
}
