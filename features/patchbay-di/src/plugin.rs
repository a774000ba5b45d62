use std::sync::{Arc, OnceLock};

use futures::{
    future::{self, BoxFuture, Shared},
    FutureExt,
};

use crate::{
    errors::ProvideError,
    host::{Host, HostKey},
    plug::{AsyncProvidingPlug, Plug, ProvidingPlug},
    types::{Injectable, Instance},
};

/// Lifecycle policy of a plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginPolicy {
    /// Always the same, already built value
    Direct,
    /// Compute on first request, cache forever
    Lazy,
    /// Compute afresh on every request
    Factory,
    /// Lazy with an async producer
    LazyAsync,
    /// Factory with an async producer
    FactoryAsync,
}

impl std::fmt::Display for PluginPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PluginPolicy::Direct => "direct",
            PluginPolicy::Lazy => "lazy",
            PluginPolicy::Factory => "factory",
            PluginPolicy::LazyAsync => "lazy-async",
            PluginPolicy::FactoryAsync => "factory-async",
        };
        f.write_str(name)
    }
}

/// Type-erased plugin, as stored by a registry.
///
/// Sync-policy plugins answer `provide` directly and wrap the result into
/// a ready future for `provide_future`. Async-policy plugins refuse the
/// sync path with a typed error and do their work in `provide_future`.
pub trait RegistryPlugin: Send + Sync {
    fn key(&self) -> &HostKey;

    fn policy(&self) -> PluginPolicy;

    /// Provide the bound value synchronously
    fn provide(&self) -> Result<Instance, ProvideError>;

    /// Provide the bound value asynchronously
    fn provide_future(&self) -> BoxFuture<'_, Result<Instance, ProvideError>>;
}

/// Plugin returning the exact original instance on every call.
/// The provider is never invoked nor copied.
pub struct DirectPlugin<T: Injectable> {
    plug: Plug<T>,
    host: Host<T>,
}

impl<T: Injectable> DirectPlugin<T> {
    pub fn new(plug: Plug<T>, host: Host<T>) -> Self {
        DirectPlugin { plug, host }
    }

    pub fn provide(&self) -> Arc<T> {
        self.plug.value()
    }
}

impl<T: Injectable> RegistryPlugin for DirectPlugin<T> {
    fn key(&self) -> &HostKey {
        self.host.key()
    }

    fn policy(&self) -> PluginPolicy {
        PluginPolicy::Direct
    }

    fn provide(&self) -> Result<Instance, ProvideError> {
        Ok(Instance::from_arc(DirectPlugin::provide(self)))
    }

    fn provide_future(&self) -> BoxFuture<'_, Result<Instance, ProvideError>> {
        future::ready(RegistryPlugin::provide(self)).boxed()
    }
}

/// Plugin invoking its producer on the first call only.
///
/// The cache cell belongs to this plugin instance. Populating it happens
/// inside the cell's critical section, so concurrent first callers cannot
/// run the producer twice.
pub struct LazyPlugin<T: Injectable> {
    plug: ProvidingPlug<T>,
    host: Host<T>,
    provided: OnceLock<Arc<T>>,
}

impl<T: Injectable> LazyPlugin<T> {
    pub fn new(plug: ProvidingPlug<T>, host: Host<T>) -> Self {
        LazyPlugin {
            plug,
            host,
            provided: OnceLock::new(),
        }
    }

    pub fn provide(&self) -> Arc<T> {
        self.provided
            .get_or_init(|| Arc::new(self.plug.produce()))
            .clone()
    }
}

impl<T: Injectable> RegistryPlugin for LazyPlugin<T> {
    fn key(&self) -> &HostKey {
        self.host.key()
    }

    fn policy(&self) -> PluginPolicy {
        PluginPolicy::Lazy
    }

    fn provide(&self) -> Result<Instance, ProvideError> {
        Ok(Instance::from_arc(LazyPlugin::provide(self)))
    }

    fn provide_future(&self) -> BoxFuture<'_, Result<Instance, ProvideError>> {
        future::ready(RegistryPlugin::provide(self)).boxed()
    }
}

/// Plugin invoking its producer on every call.
/// Returned instances are independent of each other.
pub struct FactoryPlugin<T: Injectable> {
    plug: ProvidingPlug<T>,
    host: Host<T>,
}

impl<T: Injectable> FactoryPlugin<T> {
    pub fn new(plug: ProvidingPlug<T>, host: Host<T>) -> Self {
        FactoryPlugin { plug, host }
    }

    pub fn provide(&self) -> Arc<T> {
        Arc::new(self.plug.produce())
    }
}

impl<T: Injectable> RegistryPlugin for FactoryPlugin<T> {
    fn key(&self) -> &HostKey {
        self.host.key()
    }

    fn policy(&self) -> PluginPolicy {
        PluginPolicy::Factory
    }

    fn provide(&self) -> Result<Instance, ProvideError> {
        Ok(Instance::from_arc(FactoryPlugin::provide(self)))
    }

    fn provide_future(&self) -> BoxFuture<'_, Result<Instance, ProvideError>> {
        future::ready(RegistryPlugin::provide(self)).boxed()
    }
}

/// Lazy plugin with an async producer.
///
/// The cache cell stores a shared future, so the producer future is
/// created and polled to completion at most once no matter how many
/// callers await it.
pub struct LazyAsyncPlugin<T: Injectable> {
    plug: AsyncProvidingPlug<T>,
    host: Host<T>,
    provided: OnceLock<Shared<BoxFuture<'static, Arc<T>>>>,
}

impl<T: Injectable> LazyAsyncPlugin<T> {
    pub fn new(plug: AsyncProvidingPlug<T>, host: Host<T>) -> Self {
        LazyAsyncPlugin {
            plug,
            host,
            provided: OnceLock::new(),
        }
    }

    pub async fn provide(&self) -> Arc<T> {
        self.provided
            .get_or_init(|| self.plug.produce().map(Arc::new).boxed().shared())
            .clone()
            .await
    }
}

impl<T: Injectable> RegistryPlugin for LazyAsyncPlugin<T> {
    fn key(&self) -> &HostKey {
        self.host.key()
    }

    fn policy(&self) -> PluginPolicy {
        PluginPolicy::LazyAsync
    }

    fn provide(&self) -> Result<Instance, ProvideError> {
        Err(ProvideError::AsyncPolicy {
            host: self.host.key().clone(),
            policy: self.policy(),
        })
    }

    fn provide_future(&self) -> BoxFuture<'_, Result<Instance, ProvideError>> {
        async move { Ok(Instance::from_arc(LazyAsyncPlugin::provide(self).await)) }.boxed()
    }
}

/// Factory plugin with an async producer
pub struct FactoryAsyncPlugin<T: Injectable> {
    plug: AsyncProvidingPlug<T>,
    host: Host<T>,
}

impl<T: Injectable> FactoryAsyncPlugin<T> {
    pub fn new(plug: AsyncProvidingPlug<T>, host: Host<T>) -> Self {
        FactoryAsyncPlugin { plug, host }
    }

    pub async fn provide(&self) -> Arc<T> {
        Arc::new(self.plug.produce().await)
    }
}

impl<T: Injectable> RegistryPlugin for FactoryAsyncPlugin<T> {
    fn key(&self) -> &HostKey {
        self.host.key()
    }

    fn policy(&self) -> PluginPolicy {
        PluginPolicy::FactoryAsync
    }

    fn provide(&self) -> Result<Instance, ProvideError> {
        Err(ProvideError::AsyncPolicy {
            host: self.host.key().clone(),
            policy: self.policy(),
        })
    }

    fn provide_future(&self) -> BoxFuture<'_, Result<Instance, ProvideError>> {
        async move { Ok(Instance::from_arc(FactoryAsyncPlugin::provide(self).await)) }.boxed()
    }
}
