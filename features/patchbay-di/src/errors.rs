use thiserror::Error;

use crate::{host::HostKey, plugin::PluginPolicy};

/// Two plugins were registered for the same host
#[derive(Error, Debug, Clone)]
#[error(
    "Host {host} is ambiguous in context of this registry. A {registered} \
     plugin is already registered on that host and a {offender} plugin was \
     added. Try using a mark [Host::marked(..)] to remove ambiguity"
)]
pub struct AmbiguousHost {
    pub host: HostKey,
    pub registered: PluginPolicy,
    pub offender: PluginPolicy,
}

/// Errors raised by a plugin's own provide call
#[derive(Error, Debug, Clone)]
pub enum ProvideError {
    /// A plugin running under an async policy was asked to provide
    /// synchronously
    #[error("Plugin for {host} runs under the {policy} policy and cannot provide synchronously")]
    AsyncPolicy { host: HostKey, policy: PluginPolicy },
}

/// Errors when trying to resolve a host
#[derive(Error, Debug, Clone)]
pub enum ResolveError {
    /// No plugin is registered for the host
    #[error("Missing plugin for {host} in registry {registry}")]
    MissingPlugin { host: HostKey, registry: String },
    /// The router has no registry mounted yet
    #[error("Mount is missing for this router")]
    MissingMount,
    /// The registered plugin provided a value of another type
    #[error("Failed to downcast, required: '{required}' actual: '{actual}'")]
    DowncastFailed {
        required: &'static str,
        actual: &'static str,
    },
    #[error(transparent)]
    Provide(#[from] ProvideError),
}

/// Errors when mounting a registry onto a router
#[derive(Error, Debug, Clone)]
pub enum MountError {
    /// The router already holds a registry; the mount is write-once
    #[error("This router is already mounted ({mounted})")]
    AlreadyMounted { mounted: String },
}

/// Errors while advancing a parameter resolver through its stages.
///
/// Retryable variants come from configuration that has not finished yet
/// and are expected to vanish once wiring completes. The rest indicate a
/// programming error in the declaring code and always propagate.
#[derive(Error, Debug, Clone)]
pub enum AdvanceError {
    /// The declared signature cannot be treated as a coherent callable
    #[error("Callable '{target}' is not supported: {reason}")]
    ObjectNotSupported { target: &'static str, reason: String },
    /// A parameter carries a hosted mark but declares no subject
    #[error(
        "Parameter '{param}' of '{target}' has been marked as a hosted param, \
         but no subject is declared on the signature"
    )]
    EmptyHostAnnotation {
        target: &'static str,
        param: &'static str,
    },
    /// The declared subject is not a valid host subject
    #[error("Parameter '{param}' of '{target}' declares '{subject}' which is not a valid host subject")]
    InvalidHostSubject {
        target: &'static str,
        param: &'static str,
        subject: &'static str,
    },
    /// A forward-declared subject cannot be evaluated yet
    #[error("Subject '{symbol}' of parameter '{param}' in '{target}' cannot be evaluated now")]
    UnexpectedForwardRef {
        target: &'static str,
        param: &'static str,
        symbol: &'static str,
    },
    /// Building a host resolver failed; missing mounts and missing
    /// plugins are retryable here
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl AdvanceError {
    /// Whether a later attempt of the same advance may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AdvanceError::UnexpectedForwardRef { .. }
                | AdvanceError::Resolve(ResolveError::MissingMount)
                | AdvanceError::Resolve(ResolveError::MissingPlugin { .. })
        )
    }
}

/// Errors when binding call arguments of a managed callable
#[derive(Error, Debug, Clone)]
pub enum BindError {
    /// Strict finalization failed before binding could start
    #[error(transparent)]
    Advance(#[from] AdvanceError),
    /// A hosted parameter's resolver failed at call time
    #[error(transparent)]
    Provide(#[from] ProvideError),
    #[error("'{target}' takes {expected} positional arguments but {given} were given")]
    TooManyPositional {
        target: &'static str,
        expected: usize,
        given: usize,
    },
    #[error("'{target}' got an unexpected argument '{param}'")]
    UnknownParameter {
        target: &'static str,
        param: &'static str,
    },
    #[error("'{target}' got multiple values for argument '{param}'")]
    DuplicateParameter {
        target: &'static str,
        param: &'static str,
    },
    #[error("'{target}' missing required argument '{param}'")]
    MissingArgument {
        target: &'static str,
        param: &'static str,
    },
}
