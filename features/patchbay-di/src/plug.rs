use std::{future::Future, sync::Arc};

use futures::{future::BoxFuture, FutureExt};

use crate::types::Injectable;

/// Direct provider: an already built instance.
///
/// Hands out clones of the same shared allocation, so every consumer sees
/// the exact original value.
pub struct Plug<T> {
    value: Arc<T>,
}

impl<T: Injectable> Plug<T> {
    pub fn new(value: T) -> Self {
        Plug {
            value: Arc::new(value),
        }
    }

    pub fn from_arc(value: Arc<T>) -> Self {
        Plug { value }
    }

    pub(crate) fn value(&self) -> Arc<T> {
        self.value.clone()
    }
}

/// Deferred provider: a zero-argument producer, possibly expensive or
/// impure. How often it runs is decided by the plugin policy wrapping it.
pub struct ProvidingPlug<T> {
    producer: Box<dyn Fn() -> T + Send + Sync>,
}

impl<T: Injectable> ProvidingPlug<T> {
    pub fn new(producer: impl Fn() -> T + Send + Sync + 'static) -> Self {
        ProvidingPlug {
            producer: Box::new(producer),
        }
    }

    pub(crate) fn produce(&self) -> T {
        (self.producer)()
    }
}

/// Deferred provider producing its instance asynchronously
pub struct AsyncProvidingPlug<T> {
    producer: Box<dyn Fn() -> BoxFuture<'static, T> + Send + Sync>,
}

impl<T: Injectable> AsyncProvidingPlug<T> {
    pub fn new<F, Fut>(producer: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        AsyncProvidingPlug {
            producer: Box::new(move || producer().boxed()),
        }
    }

    pub(crate) fn produce(&self) -> BoxFuture<'static, T> {
        (self.producer)()
    }
}
