use std::{
    any::TypeId,
    collections::{HashMap, HashSet},
    sync::Arc,
};

use crate::{
    errors::{AdvanceError, ProvideError, ResolveError},
    host::HostKey,
    manage::signature::{HostedMark, ParamDefault, Signature, Subject},
    types::{Instance, TypeInfo},
};

/// Zero-argument resolver producing the value for one hosted parameter
pub type HostResolverFn = Arc<dyn Fn() -> Result<Instance, ProvideError> + Send + Sync>;

/// Callback turning a host key into a cached resolver function.
/// Ultimately backed by a mounted router.
pub type ResolveCallback =
    Arc<dyn Fn(&HostKey) -> Result<HostResolverFn, ResolveError> + Send + Sync>;

/// Hosted parameter as discovered from the signature
#[derive(Debug, Clone)]
pub struct DefaultStage {
    pub name: &'static str,
    pub mark: HostedMark,
    pub subject: Subject,
}

/// Hosted parameter paired with its validated host key
#[derive(Debug, Clone)]
pub struct HostStage {
    pub name: &'static str,
    pub mark: HostedMark,
    pub host: HostKey,
}

/// Hosted parameter paired with its cached resolver
#[derive(Clone)]
pub struct ResolverStage {
    pub name: &'static str,
    pub host: HostKey,
    pub resolver: HostResolverFn,
}

/// Progressively more complete snapshots of what a managed callable
/// needs. Stages only move forward; a failed advance leaves the caller at
/// the last stage it reached, so retryable failures can be retried later.
#[derive(Clone)]
pub enum ParamsState {
    Nothing(NothingParams),
    Defaults(DefaultParams),
    Hosts(HostParams),
    Resolvers(ResolverParams),
}

impl std::fmt::Debug for ParamsState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stage = match self {
            ParamsState::Nothing(_) => "Nothing",
            ParamsState::Defaults(_) => "Defaults",
            ParamsState::Hosts(_) => "Hosts",
            ParamsState::Resolvers(_) => "Resolvers",
        };
        f.debug_tuple("ParamsState").field(&stage).finish()
    }
}

impl ParamsState {
    pub fn new(signature: Signature, callback: ResolveCallback) -> Self {
        ParamsState::Nothing(NothingParams {
            signature,
            callback,
        })
    }

    pub fn stage_name(&self) -> &'static str {
        match self {
            ParamsState::Nothing(_) => "NothingReady",
            ParamsState::Defaults(_) => "DefaultsReady",
            ParamsState::Hosts(_) => "HostsReady",
            ParamsState::Resolvers(_) => "ResolversReady",
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, ParamsState::Resolvers(_))
    }

    pub fn as_final(&self) -> Option<&ResolverParams> {
        match self {
            ParamsState::Resolvers(state) => Some(state),
            _ => None,
        }
    }

    /// Produces the next stage, or a typed error describing why advancing
    /// is impossible right now
    pub fn advance(&self) -> Result<ParamsState, AdvanceError> {
        match self {
            ParamsState::Nothing(state) => state.advance().map(ParamsState::Defaults),
            ParamsState::Defaults(state) => state.advance().map(ParamsState::Hosts),
            ParamsState::Hosts(state) => state.advance().map(ParamsState::Resolvers),
            ParamsState::Resolvers(state) => Ok(ParamsState::Resolvers(state.clone())),
        }
    }
}

/// Raw signature, nothing inspected yet
#[derive(Clone)]
pub struct NothingParams {
    signature: Signature,
    callback: ResolveCallback,
}

impl NothingParams {
    /// Inspects the signature and picks out the hosted-marked parameters.
    ///
    /// A signature that cannot be treated as a coherent callable surface
    /// is rejected for good; waiting will not fix it.
    fn advance(&self) -> Result<DefaultParams, AdvanceError> {
        let mut seen = HashSet::new();
        for param in self.signature.params() {
            if !seen.insert(param.name()) {
                return Err(AdvanceError::ObjectNotSupported {
                    target: self.signature.target(),
                    reason: format!("duplicate parameter '{}'", param.name()),
                });
            }
        }

        let hosted = self
            .signature
            .params()
            .iter()
            .filter_map(|param| match param.default() {
                ParamDefault::Hosted(mark) => Some(DefaultStage {
                    name: param.name(),
                    mark: mark.clone(),
                    subject: param.subject().clone(),
                }),
                ParamDefault::Required => None,
            })
            .collect();

        Ok(DefaultParams {
            signature: self.signature.clone(),
            callback: self.callback.clone(),
            params: hosted,
        })
    }
}

/// Hosted parameters discovered, subjects not yet validated
#[derive(Clone)]
pub struct DefaultParams {
    signature: Signature,
    callback: ResolveCallback,
    params: Vec<DefaultStage>,
}

impl DefaultParams {
    /// Resolves every hosted parameter's subject into a host key.
    ///
    /// Deferred subjects that cannot be evaluated yet halt the advance
    /// with a retryable error; missing or invalid subjects are
    /// programming errors in the declaring code and always propagate.
    fn advance(&self) -> Result<HostParams, AdvanceError> {
        let target = self.signature.target();
        let mut staged = Vec::with_capacity(self.params.len());

        for stage in &self.params {
            let info = match &stage.subject {
                Subject::Empty => {
                    return Err(AdvanceError::EmptyHostAnnotation {
                        target,
                        param: stage.name,
                    })
                }
                Subject::Typed(info) => *info,
                Subject::Deferred { symbol, resolve } => {
                    resolve().ok_or(AdvanceError::UnexpectedForwardRef {
                        target,
                        param: stage.name,
                        symbol: *symbol,
                    })?
                }
            };

            validate_subject(target, stage.name, info)?;

            staged.push(HostStage {
                name: stage.name,
                mark: stage.mark.clone(),
                host: HostKey::new(info, stage.mark.marks().to_vec()),
            });
        }

        Ok(HostParams {
            signature: self.signature.clone(),
            callback: self.callback.clone(),
            params: staged,
        })
    }
}

fn validate_subject(
    target: &'static str,
    param: &'static str,
    info: TypeInfo,
) -> Result<(), AdvanceError> {
    // The marker type itself can never be a host subject
    if info.type_id == TypeId::of::<HostedMark>() {
        return Err(AdvanceError::InvalidHostSubject {
            target,
            param,
            subject: info.type_name,
        });
    }
    Ok(())
}

/// Host keys validated, resolvers not yet built
#[derive(Clone)]
pub struct HostParams {
    signature: Signature,
    callback: ResolveCallback,
    params: Vec<HostStage>,
}

impl HostParams {
    /// Asks the resolve callback for a zero-argument resolver per host.
    ///
    /// Both failure modes here mean configuration has not caught up with
    /// the declaration: the router may not be mounted yet, or the plugin
    /// may not be registered yet. The same advance can succeed later.
    fn advance(&self) -> Result<ResolverParams, AdvanceError> {
        let mut staged = Vec::with_capacity(self.params.len());
        let mut map = HashMap::with_capacity(self.params.len());

        for stage in &self.params {
            let resolver = (self.callback)(&stage.host)?;
            map.insert(stage.name, resolver.clone());
            staged.push(ResolverStage {
                name: stage.name,
                host: stage.host.clone(),
                resolver,
            });
        }

        Ok(ResolverParams {
            signature: self.signature.clone(),
            params: staged,
            map,
        })
    }
}

/// Terminal stage: every hosted parameter has a cached resolver
#[derive(Clone)]
pub struct ResolverParams {
    signature: Signature,
    params: Vec<ResolverStage>,
    map: HashMap<&'static str, HostResolverFn>,
}

impl ResolverParams {
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn params(&self) -> &[ResolverStage] {
        &self.params
    }

    /// Prepared map of parameter names to their resolvers
    pub fn resolver_map(&self) -> &HashMap<&'static str, HostResolverFn> {
        &self.map
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::manage::signature::{hosted, Param};

    fn accepting_callback() -> ResolveCallback {
        Arc::new(|key: &HostKey| {
            let value = key.to_string();
            Ok(Arc::new(move || Ok(Instance::new(value.clone()))) as HostResolverFn)
        })
    }

    fn unmounted_callback() -> ResolveCallback {
        Arc::new(|_: &HostKey| Err(ResolveError::MissingMount))
    }

    fn signature_with_hosted() -> Signature {
        Signature::of("some_function")
            .param(Param::required("x"))
            .param(Param::hosted::<String>("some", hosted()))
    }

    #[test]
    fn advances_through_all_stages() {
        let mut state = ParamsState::new(signature_with_hosted(), accepting_callback());
        assert_eq!(state.stage_name(), "NothingReady");

        state = state.advance().unwrap();
        assert_eq!(state.stage_name(), "DefaultsReady");

        state = state.advance().unwrap();
        assert_eq!(state.stage_name(), "HostsReady");

        state = state.advance().unwrap();
        assert_eq!(state.stage_name(), "ResolversReady");
        assert!(state.is_final());

        let final_state = state.as_final().unwrap();
        assert_eq!(final_state.params().len(), 1);
        assert!(final_state.resolver_map().contains_key("some"));
    }

    #[test]
    fn final_stage_advances_to_itself() {
        let mut state = ParamsState::new(signature_with_hosted(), accepting_callback());
        for _ in 0..5 {
            state = state.advance().unwrap();
        }
        assert!(state.is_final());
    }

    #[test]
    fn duplicate_parameter_names_are_not_supported() {
        let signature = Signature::of("broken")
            .param(Param::required("x"))
            .param(Param::hosted::<String>("x", hosted()));
        let state = ParamsState::new(signature, accepting_callback());

        let err = state.advance().unwrap_err();
        assert!(matches!(err, AdvanceError::ObjectNotSupported { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn hosted_param_without_subject_is_fatal() {
        let signature = Signature::of("broken").param(Param::hosted_with(
            "some",
            Subject::Empty,
            hosted(),
        ));
        let state = ParamsState::new(signature, accepting_callback())
            .advance()
            .unwrap();

        let err = state.advance().unwrap_err();
        assert!(matches!(err, AdvanceError::EmptyHostAnnotation { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn marker_type_is_not_a_valid_subject() {
        let signature = Signature::of("broken").param(Param::hosted::<HostedMark>(
            "some",
            hosted(),
        ));
        let state = ParamsState::new(signature, accepting_callback())
            .advance()
            .unwrap();

        let err = state.advance().unwrap_err();
        assert!(matches!(err, AdvanceError::InvalidHostSubject { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn deferred_subject_halts_until_it_yields() {
        let ready = Arc::new(AtomicBool::new(false));
        let flag = ready.clone();
        let signature = Signature::of("late").param(Param::hosted_with(
            "some",
            Subject::deferred("LateType", move || {
                flag.load(Ordering::SeqCst).then(TypeInfo::of::<String>)
            }),
            hosted(),
        ));

        let state = ParamsState::new(signature, accepting_callback())
            .advance()
            .unwrap();

        let err = state.advance().unwrap_err();
        assert!(matches!(err, AdvanceError::UnexpectedForwardRef { .. }));
        assert!(err.is_retryable());

        // Once the symbol becomes evaluable the same advance succeeds
        ready.store(true, Ordering::SeqCst);
        let advanced = state.advance().unwrap();
        assert_eq!(advanced.stage_name(), "HostsReady");
    }

    #[test]
    fn missing_mount_halts_the_resolver_stage() {
        let state = ParamsState::new(signature_with_hosted(), unmounted_callback())
            .advance()
            .unwrap()
            .advance()
            .unwrap();

        let err = state.advance().unwrap_err();
        assert!(matches!(
            err,
            AdvanceError::Resolve(ResolveError::MissingMount)
        ));
        assert!(err.is_retryable());
    }
}
