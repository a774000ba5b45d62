//! Patchbay DI is a dependency-resolution runtime: callers declare hosts
//! (a subject type plus optional disambiguating marks) and the runtime
//! supplies a concrete instance according to a registered plugin and its
//! lifecycle policy.
//!
//! The crate is split into three major parts:
//! 1. Core bindings: [`Host`], [`Plug`] and the plugin policies, indexed
//!    by an immutable [`Registry`]
//! 2. Routing: a write-once [`Router`] as the resolution entry point
//! 3. Managing: call-time parameter substitution for callables that
//!    declare hosted parameters, driven by a staged [`ParameterResolver`]
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use patchbay_di::{DirectPlugin, Host, Plug, Registry, RegistryPlugin, Router};
//!
//! fn wire() {
//!     let plugins: Vec<Arc<dyn RegistryPlugin>> = vec![
//!         Arc::new(DirectPlugin::new(
//!             Plug::new("Scott".to_string()),
//!             Host::marked("FIRST_NAME"),
//!         )),
//!         Arc::new(DirectPlugin::new(
//!             Plug::new("Tiger".to_string()),
//!             Host::marked("LAST_NAME"),
//!         )),
//!     ];
//!
//!     let router = Router::new();
//!     router.mount(Registry::new(plugins).unwrap()).unwrap();
//!
//!     let first = router.resolve(&Host::<String>::marked("FIRST_NAME")).unwrap();
//!     assert_eq!(*first, "Scott");
//! }
//! ```

pub mod errors;
pub mod host;
pub mod manage;
pub mod plug;
pub mod plugin;
pub mod registry;
pub mod router;
pub mod types;

pub use errors::{
    AdvanceError, AmbiguousHost, BindError, MountError, ProvideError, ResolveError,
};
pub use host::{Host, HostKey};
pub use manage::{
    hosted, hosted_marked, BoundArgs, CallArgs, HostResolverFn, HostedMark, Managed, Param,
    ParamDefault, ParameterResolver, ParamsState, ResolveCallback, Signature, Subject,
};
pub use plug::{AsyncProvidingPlug, Plug, ProvidingPlug};
pub use plugin::{
    DirectPlugin, FactoryAsyncPlugin, FactoryPlugin, LazyAsyncPlugin, LazyPlugin, PluginPolicy,
    RegistryPlugin,
};
pub use registry::Registry;
pub use router::Router;
pub use types::{Injectable, Instance, Mark, TypeInfo};
