use std::{
    any::type_name,
    collections::{hash_map::Entry, HashMap},
    fmt::Debug,
    sync::Arc,
};

use crate::{
    errors::{AmbiguousHost, ResolveError},
    host::{Host, HostKey},
    plugin::RegistryPlugin,
    types::{Injectable, Instance},
};

/// Immutable host-to-plugin index.
///
/// Built once from a finite plugin collection and read-only for the rest
/// of its life. The handle is cheap to clone; clones share the same inner
/// state. A registry is itself injectable, so one registry can be plugged
/// into another as a direct value.
#[derive(Clone)]
pub struct Registry(Arc<RegistryInner>);

struct RegistryInner {
    plugins: HashMap<HostKey, Arc<dyn RegistryPlugin>>,
}

impl Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_struct("Registry");
        for (key, plugin) in &self.0.plugins {
            let name = key.to_string();
            map.field(&name, &plugin.policy());
        }
        map.finish()
    }
}

impl Registry {
    /// Builds the index, rejecting any host registered twice
    pub fn new(
        plugins: impl IntoIterator<Item = Arc<dyn RegistryPlugin>>,
    ) -> Result<Self, AmbiguousHost> {
        let mut map = HashMap::new();

        for plugin in plugins {
            let key = plugin.key().clone();
            match map.entry(key) {
                Entry::Occupied(existing) => {
                    let registered: &Arc<dyn RegistryPlugin> = existing.get();
                    return Err(AmbiguousHost {
                        host: existing.key().clone(),
                        registered: registered.policy(),
                        offender: plugin.policy(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(plugin);
                }
            }
        }

        tracing::debug!("Built registry with {} plugins", map.len());
        Ok(Registry(Arc::new(RegistryInner { plugins: map })))
    }

    /// Returns the plugin registered for the host key
    pub fn plugin(&self, key: &HostKey) -> Result<Arc<dyn RegistryPlugin>, ResolveError> {
        match self.0.plugins.get(key) {
            Some(plugin) => Ok(plugin.clone()),
            None => {
                tracing::error!("Tried to resolve an unregistered host: {}", key);
                Err(ResolveError::MissingPlugin {
                    host: key.clone(),
                    registry: format!("{self:?}"),
                })
            }
        }
    }

    /// Looks up the host's plugin and lets it provide
    pub fn resolve<T: Injectable>(&self, host: &Host<T>) -> Result<Arc<T>, ResolveError> {
        let instance = self.plugin(host.key())?.provide()?;
        downcast_resolved(instance)
    }

    /// Async counterpart of [`Registry::resolve`]; also serves plugins
    /// running under sync policies
    pub async fn resolve_async<T: Injectable>(&self, host: &Host<T>) -> Result<Arc<T>, ResolveError> {
        let plugin = self.plugin(host.key())?;
        let instance = plugin.provide_future().await?;
        downcast_resolved(instance)
    }

    /// Erased resolution used by managed-callable plumbing
    pub fn resolve_erased(&self, key: &HostKey) -> Result<Instance, ResolveError> {
        Ok(self.plugin(key)?.provide()?)
    }
}

fn downcast_resolved<T: Injectable>(instance: Instance) -> Result<Arc<T>, ResolveError> {
    instance
        .downcast()
        .map_err(|actual| ResolveError::DowncastFailed {
            required: type_name::<T>(),
            actual,
        })
}
