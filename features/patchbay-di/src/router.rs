use std::sync::{Arc, OnceLock};

use crate::{
    errors::{AdvanceError, MountError, ResolveError},
    host::{Host, HostKey},
    manage::{
        state::{HostResolverFn, ResolveCallback},
        ParameterResolver, Signature,
    },
    registry::Registry,
    types::Injectable,
};

/// Single-assignment holder of exactly one registry and the public
/// resolution entry point.
///
/// A router is created empty, mounted exactly once and used for the rest
/// of the process (or test) lifetime. The handle is cheap to clone;
/// clones share the same mount.
#[derive(Clone, Default)]
pub struct Router(Arc<RouterInner>);

#[derive(Default)]
struct RouterInner {
    mounted: OnceLock<Registry>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches the registry. The mount is write-once; under concurrent
    /// attempts exactly one succeeds and the rest observe the error.
    pub fn mount(&self, registry: Registry) -> Result<(), MountError> {
        self.0.mounted.set(registry).map_err(|_| {
            let mounted = self
                .0
                .mounted
                .get()
                .map(|registry| format!("{registry:?}"))
                .unwrap_or_default();
            MountError::AlreadyMounted { mounted }
        })?;
        tracing::debug!("Mounted registry onto router");
        Ok(())
    }

    /// Returns the mounted registry
    pub fn registry(&self) -> Result<&Registry, ResolveError> {
        self.0.mounted.get().ok_or(ResolveError::MissingMount)
    }

    /// Delegates resolution to the mounted registry
    pub fn resolve<T: Injectable>(&self, host: &Host<T>) -> Result<Arc<T>, ResolveError> {
        self.registry()?.resolve(host)
    }

    /// Async counterpart of [`Router::resolve`]
    pub async fn resolve_async<T: Injectable>(&self, host: &Host<T>) -> Result<Arc<T>, ResolveError> {
        self.registry()?.resolve_async(host).await
    }

    /// Builds the zero-argument resolver for one host, bound to the
    /// mounted registry's plugin. This is the resolution callback handed
    /// to parameter resolvers.
    pub fn host_resolver(&self, key: &HostKey) -> Result<HostResolverFn, ResolveError> {
        let plugin = self.registry()?.plugin(key)?;
        Ok(Arc::new(move || plugin.provide()))
    }

    /// Resolution callback backed by this router.
    ///
    /// The callback holds a clone of the handle, so it can be created
    /// before any registry is mounted; failures surface when the
    /// parameter resolver tries to advance.
    pub fn resolve_callback(&self) -> ResolveCallback {
        let router = self.clone();
        Arc::new(move |key: &HostKey| router.host_resolver(key))
    }

    /// Turns a declared signature into a parameter resolver managed by
    /// this router.
    ///
    /// This works before the router is mounted: finalization is attempted
    /// but retryable failures are deferred to call time.
    pub fn manage(&self, signature: Signature) -> Result<ParameterResolver, AdvanceError> {
        ParameterResolver::new(signature, self.resolve_callback())
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.mounted.get() {
            Some(registry) => f.debug_tuple("Router").field(registry).finish(),
            None => f.debug_tuple("Router").field(&"unmounted").finish(),
        }
    }
}
