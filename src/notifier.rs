//! The notifier: registration plus fan-out dispatch.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, trace};

use crate::config::NotifierConfig;
use crate::context::{ChainFn, ExecutionContext};
use crate::error::NotifierError;
use crate::key::TypeKey;
use crate::registry::Registry;
use crate::spawn::{Spawner, ThreadSpawner};

/// A type-erased handler for values of type `T`.
pub type HandlerFn<T> = Arc<dyn Fn(T) + Send + Sync>;

/// A middleware. It sees every publish and forwards with
/// [`ExecutionContext::next`].
pub type MiddlewareFn = ChainFn;

/// Type-keyed publish/subscribe dispatcher.
///
/// Clones share the same registry and spawner.
///
/// ## Example
///
/// ```
/// use std::sync::mpsc::channel;
/// use std::sync::Mutex;
/// use std::time::Duration;
/// use typed_notifier::{ExecutionContext, Notifier};
///
/// #[derive(Clone)]
/// struct OrderPlaced {
///     id: u64,
/// }
///
/// let notifier = Notifier::new();
/// let (tx, rx) = channel();
/// let tx = Mutex::new(tx);
///
/// // Drop orders with id 0, forward everything else.
/// notifier
///     .register_middleware(|ctx: &mut ExecutionContext| {
///         if ctx.parameter::<OrderPlaced>().map_or(true, |order| order.id != 0) {
///             ctx.next();
///         }
///     })
///     .unwrap();
/// notifier
///     .register_handler(move |order: OrderPlaced| {
///         tx.lock().unwrap().send(order.id).unwrap();
///     })
///     .unwrap();
///
/// notifier.publish(OrderPlaced { id: 0 });
/// notifier.publish(OrderPlaced { id: 42 });
///
/// assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 42);
/// ```
#[derive(Clone)]
pub struct Notifier {
    registry: Registry,
    spawner: Arc<dyn Spawner>,
    config: NotifierConfig,
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("config", &self.config)
            .field("keys", &self.registry.keys().len())
            .field("middlewares", &self.registry.middleware_count())
            .finish_non_exhaustive()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    /// Notifier with the default configuration, one thread per handler.
    pub fn new() -> Self {
        Self::with_config(NotifierConfig::default())
    }

    pub fn with_config(config: NotifierConfig) -> Self {
        let spawner = ThreadSpawner::new(&config);
        Self::with_spawner(config, spawner)
    }

    /// Notifier that schedules handler chains on `spawner`.
    pub fn with_spawner<S: Spawner + 'static>(config: NotifierConfig, spawner: S) -> Self {
        Self {
            registry: Registry::new(),
            spawner: Arc::new(spawner),
            config,
        }
    }

    /// Register `handler` for every published `T`.
    pub fn register_handler<T, F>(&self, handler: F) -> Result<(), NotifierError>
    where
        T: Any + Clone + Send,
        F: Fn(T) + Send + Sync + 'static,
    {
        let handler: HandlerFn<T> = Arc::new(handler);
        self.register_handler_fn(Some(handler))
    }

    /// Register an optional handler for `T`.
    ///
    /// `None` fails with [`NotifierError::InvalidArgument`] and registers
    /// nothing.
    pub fn register_handler_fn<T>(&self, handler: Option<HandlerFn<T>>) -> Result<(), NotifierError>
    where
        T: Any + Clone + Send,
    {
        let key = TypeKey::of::<T>();
        let adapter = handler.map(|handler| {
            Arc::new(move |ctx: &mut ExecutionContext| {
                // Stored under TypeKey::of::<T>() and publish::<T> seeds the
                // context with a T; contexts never change the parameter type.
                if let Some(value) = ctx.parameter::<T>() {
                    handler(value.clone());
                }
            }) as ChainFn
        });

        let count = self.registry.add_handler(key, adapter)?;
        debug!(type_name = key.name(), handlers = count, "registered handler");
        Ok(())
    }

    /// Register a middleware that runs in front of every handler, in
    /// registration order.
    pub fn register_middleware<F>(&self, middleware: F) -> Result<(), NotifierError>
    where
        F: Fn(&mut ExecutionContext) + Send + Sync + 'static,
    {
        let middleware: MiddlewareFn = Arc::new(middleware);
        self.register_middleware_fn(Some(middleware))
    }

    /// Register an optional middleware. `None` fails with
    /// [`NotifierError::InvalidArgument`].
    pub fn register_middleware_fn(
        &self,
        middleware: Option<MiddlewareFn>,
    ) -> Result<(), NotifierError> {
        let count = self.registry.add_middleware(middleware)?;
        debug!(middlewares = count, "registered middleware");
        Ok(())
    }

    /// Deliver `value` to every handler registered for `T`.
    ///
    /// Each handler gets its own context (its own clone of `value`, the
    /// middlewares, then the handler) scheduled on the spawner. Returns once
    /// every chain is scheduled; nothing is awaited and handler outcomes are
    /// not reported back. Publishing a type nobody handles does nothing.
    pub fn publish<T>(&self, value: T)
    where
        T: Any + Clone + Send,
    {
        let key = TypeKey::of::<T>();
        let Some(snapshot) = self.registry.snapshot(&key) else {
            trace!(type_name = key.name(), "no handlers registered");
            return;
        };

        trace!(
            type_name = key.name(),
            handlers = snapshot.handlers.len(),
            middlewares = snapshot.middlewares.len(),
            "publishing"
        );

        for handler in &snapshot.handlers {
            let mut ctx = ExecutionContext::new(value.clone(), snapshot.chain_for(handler));
            if let Err(err) = self.spawner.spawn(Box::new(move || ctx.next())) {
                error!(type_name = key.name(), error = %err, "failed to schedule handler chain");
            }
        }
    }

    /// Number of handlers registered for `T`.
    pub fn handler_count<T: Any>(&self) -> usize {
        self.registry.handler_count(&TypeKey::of::<T>())
    }

    pub fn middleware_count(&self) -> usize {
        self.registry.middleware_count()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }
}
