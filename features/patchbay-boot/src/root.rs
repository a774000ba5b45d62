use std::sync::{Arc, OnceLock};

use thiserror::Error;

use patchbay_di::{AmbiguousHost, Host, MountError, Registry, RegistryPlugin, Router};

use crate::builder::plug;

/// Errors while assembling a root router/registry pair
#[derive(Error, Debug, Clone)]
pub enum BootError {
    #[error(transparent)]
    AmbiguousHost(#[from] AmbiguousHost),
    #[error(transparent)]
    Mount(#[from] MountError),
    /// The process-wide root pair was already initialized
    #[error("The root router/registry pair is already initialized")]
    AlreadyBooted,
}

/// An explicitly constructed root router/registry pair.
///
/// The pair is assembled in one step: user plugins are extended with a
/// plugin hosting the router itself under the `"root"` mark, the registry
/// is built and mounted. Pass the pair down to the code that needs it;
/// the core has no hidden globals.
pub struct Boot {
    router: Router,
    registry: Registry,
}

impl Boot {
    pub fn new(plugins: Vec<Arc<dyn RegistryPlugin>>) -> Result<Self, BootError> {
        let router = Router::new();

        let mut all = plugins;
        all.push(plug(router.clone()).into(Self::router_host()).direct());

        let registry = Registry::new(all)?;
        router.mount(registry.clone())?;

        tracing::debug!("Booted root pair");
        Ok(Boot { router, registry })
    }

    /// Host under which every booted registry carries its own router
    pub fn router_host() -> Host<Router> {
        Host::marked("root")
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

static ROOT: OnceLock<Boot> = OnceLock::new();

/// Initializes the optional process-wide root pair.
///
/// This is a convenience for applications that want one ambient pair;
/// libraries should take a [`Router`] or [`Registry`] explicitly instead.
pub fn init_root(plugins: Vec<Arc<dyn RegistryPlugin>>) -> Result<&'static Boot, BootError> {
    let mut built = Some(Boot::new(plugins)?);
    let root = ROOT.get_or_init(|| built.take().expect("init closure runs at most once"));
    if built.is_none() {
        Ok(root)
    } else {
        Err(BootError::AlreadyBooted)
    }
}

/// The process-wide root pair, if [`init_root`] ran
pub fn root() -> Option<&'static Boot> {
    ROOT.get()
}
