use std::{future::Future, sync::Arc};

use patchbay_di::{
    AsyncProvidingPlug, DirectPlugin, FactoryAsyncPlugin, FactoryPlugin, Host, Injectable,
    LazyAsyncPlugin, LazyPlugin, Plug, ProvidingPlug, RegistryPlugin,
};

/// Plug an already built instance. Proceed with `.into(..)` and
/// `.direct()` to finish plugin creation.
pub fn plug<T: Injectable>(value: T) -> PlugFacade<T> {
    PlugFacade {
        plug: Plug::new(value),
    }
}

/// Plug a zero-argument producer. Proceed with `.into(..)` and
/// `.lazy()` / `.factory()` to finish plugin creation.
pub fn plug_with<T: Injectable>(
    producer: impl Fn() -> T + Send + Sync + 'static,
) -> ProvidingPlugFacade<T> {
    ProvidingPlugFacade {
        plug: ProvidingPlug::new(producer),
    }
}

/// Plug an async producer. Proceed with `.into(..)` and
/// `.lazy()` / `.factory()` to finish plugin creation.
pub fn plug_future<T, F, Fut>(producer: F) -> AsyncProvidingPlugFacade<T>
where
    T: Injectable,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = T> + Send + 'static,
{
    AsyncProvidingPlugFacade {
        plug: AsyncProvidingPlug::new(producer),
    }
}

pub struct PlugFacade<T: Injectable> {
    plug: Plug<T>,
}

impl<T: Injectable> PlugFacade<T> {
    pub fn into(self, host: Host<T>) -> PluginSelector<T> {
        PluginSelector {
            plug: self.plug,
            host,
        }
    }
}

pub struct PluginSelector<T: Injectable> {
    plug: Plug<T>,
    host: Host<T>,
}

impl<T: Injectable> PluginSelector<T> {
    /// The plugged instance is handed out as-is on every resolution
    pub fn direct(self) -> Arc<dyn RegistryPlugin> {
        Arc::new(DirectPlugin::new(self.plug, self.host))
    }
}

pub struct ProvidingPlugFacade<T: Injectable> {
    plug: ProvidingPlug<T>,
}

impl<T: Injectable> ProvidingPlugFacade<T> {
    pub fn into(self, host: Host<T>) -> ProvidingPluginSelector<T> {
        ProvidingPluginSelector {
            plug: self.plug,
            host,
        }
    }
}

pub struct ProvidingPluginSelector<T: Injectable> {
    plug: ProvidingPlug<T>,
    host: Host<T>,
}

impl<T: Injectable> ProvidingPluginSelector<T> {
    /// The producer runs once, on the first resolution; the result is
    /// cached for every later one
    pub fn lazy(self) -> Arc<dyn RegistryPlugin> {
        Arc::new(LazyPlugin::new(self.plug, self.host))
    }

    /// The producer runs on every resolution
    pub fn factory(self) -> Arc<dyn RegistryPlugin> {
        Arc::new(FactoryPlugin::new(self.plug, self.host))
    }
}

pub struct AsyncProvidingPlugFacade<T: Injectable> {
    plug: AsyncProvidingPlug<T>,
}

impl<T: Injectable> AsyncProvidingPlugFacade<T> {
    pub fn into(self, host: Host<T>) -> AsyncProvidingPluginSelector<T> {
        AsyncProvidingPluginSelector {
            plug: self.plug,
            host,
        }
    }
}

pub struct AsyncProvidingPluginSelector<T: Injectable> {
    plug: AsyncProvidingPlug<T>,
    host: Host<T>,
}

impl<T: Injectable> AsyncProvidingPluginSelector<T> {
    /// The producer future runs at most once; every resolution awaits
    /// the shared result
    pub fn lazy(self) -> Arc<dyn RegistryPlugin> {
        Arc::new(LazyAsyncPlugin::new(self.plug, self.host))
    }

    /// A fresh producer future runs on every resolution
    pub fn factory(self) -> Arc<dyn RegistryPlugin> {
        Arc::new(FactoryAsyncPlugin::new(self.plug, self.host))
    }
}
