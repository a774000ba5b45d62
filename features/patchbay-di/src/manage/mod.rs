//! Call-time parameter substitution for managed callables.
//!
//! A managed callable declares its surface as a [`Signature`]; parameters
//! whose default is a [`HostedMark`] are supplied by the runtime at call
//! time unless the caller overrides them. Validation and wiring happen in
//! a staged state machine that tolerates being used before the router and
//! registry are fully configured.

pub mod resolver;
pub mod signature;
pub mod state;

pub use resolver::{BoundArgs, CallArgs, Managed, ParameterResolver};
pub use signature::{hosted, hosted_marked, HostedMark, Param, ParamDefault, Signature, Subject};
pub use state::{HostResolverFn, ParamsState, ResolveCallback};
