//! In-process, type-keyed publish/subscribe with a middleware chain.
//!
//! Handlers are registered for a concrete type. Publishing a value of that
//! type runs every one of its handlers, each on its own thread and each
//! behind the registered middlewares:
//!
//! ```text
//! publish(value: T)
//!        │  read lock, snapshot, unlock
//!        ▼
//! ┌──────────────────────────────────────────────┐
//! │ Registry                                     │
//! │   TypeKey(T) ─► [handler_a, handler_b]       │
//! │   middlewares ─► [auth, audit]               │
//! └──────────────────────────────────────────────┘
//!        │ one ExecutionContext per handler
//!        ▼
//!   spawn: auth ─► audit ─► handler_a
//!   spawn: auth ─► audit ─► handler_b
//! ```
//!
//! Middlewares forward with [`ExecutionContext::next`] or stop the chain by
//! returning without it. Calling `next` past the end of a chain is a no-op.
//!
//! Delivery is fire-and-forget: `publish` never waits for handlers, reports
//! no failures, and gives no ordering between handlers.

mod config;
mod context;
mod error;
mod global;
mod key;
mod notifier;
mod registry;
pub mod spawn;

pub use config::NotifierConfig;
pub use context::{ChainFn, ExecutionContext};
pub use error::NotifierError;
pub use global::{
    global, init_global, publish, register_handler, register_handler_fn, register_middleware,
    register_middleware_fn,
};
pub use key::TypeKey;
pub use notifier::{HandlerFn, MiddlewareFn, Notifier};
pub use registry::{Registry, Snapshot};
pub use spawn::{Spawner, ThreadSpawner};
