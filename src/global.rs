//! Process-wide notifier.
//!
//! The free functions here all operate on one lazily created [`Notifier`].
//! Call [`init_global`] before anything else to use a custom configuration
//! or spawner; otherwise the first call creates a default one. There is no
//! teardown.
//!
//! ```
//! use typed_notifier::{publish, register_handler};
//!
//! #[derive(Clone)]
//! struct UserSignedUp(String);
//!
//! register_handler(|event: UserSignedUp| println!("welcome, {}", event.0)).unwrap();
//! publish(UserSignedUp("ada".into()));
//! ```

use std::any::Any;
use std::sync::OnceLock;

use crate::context::ExecutionContext;
use crate::error::NotifierError;
use crate::notifier::{HandlerFn, MiddlewareFn, Notifier};

static GLOBAL: OnceLock<Notifier> = OnceLock::new();

/// Install `notifier` as the process-wide instance.
///
/// Fails with [`NotifierError::AlreadyInitialized`] once a global notifier
/// exists, including one created implicitly by an earlier call.
pub fn init_global(notifier: Notifier) -> Result<&'static Notifier, NotifierError> {
    GLOBAL
        .set(notifier)
        .map_err(|_| NotifierError::AlreadyInitialized)?;
    Ok(global())
}

/// The process-wide notifier, created with defaults on first use.
pub fn global() -> &'static Notifier {
    GLOBAL.get_or_init(Notifier::new)
}

/// Register a handler on the global notifier.
pub fn register_handler<T, F>(handler: F) -> Result<(), NotifierError>
where
    T: Any + Clone + Send,
    F: Fn(T) + Send + Sync + 'static,
{
    global().register_handler(handler)
}

/// Register an optional handler on the global notifier.
pub fn register_handler_fn<T>(handler: Option<HandlerFn<T>>) -> Result<(), NotifierError>
where
    T: Any + Clone + Send,
{
    global().register_handler_fn(handler)
}

/// Register a middleware on the global notifier.
pub fn register_middleware<F>(middleware: F) -> Result<(), NotifierError>
where
    F: Fn(&mut ExecutionContext) + Send + Sync + 'static,
{
    global().register_middleware(middleware)
}

/// Register an optional middleware on the global notifier.
pub fn register_middleware_fn(middleware: Option<MiddlewareFn>) -> Result<(), NotifierError> {
    global().register_middleware_fn(middleware)
}

/// Publish `value` on the global notifier.
pub fn publish<T>(value: T)
where
    T: Any + Clone + Send,
{
    global().publish(value)
}
