use std::sync::Arc;

use crate::{
    errors::{AdvanceError, BindError},
    manage::{
        signature::{ParamDefault, Signature},
        state::{ParamsState, ResolveCallback},
    },
    types::{Injectable, Instance},
};

/// Arguments a caller passes to a managed callable.
///
/// Positional values fill the leading declared parameters; keyword values
/// fill by name, exactly as the original callable would be invoked.
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    positional: Vec<Instance>,
    keyword: Vec<(&'static str, Instance)>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positional(mut self, value: impl Injectable) -> Self {
        self.positional.push(Instance::new(value));
        self
    }

    pub fn keyword(mut self, name: &'static str, value: impl Injectable) -> Self {
        self.keyword.push((name, Instance::new(value)));
        self
    }
}

/// Final argument set, directly usable to invoke the target callable.
/// Values appear in declaration order.
#[derive(Debug, Clone)]
pub struct BoundArgs {
    values: Vec<(&'static str, Instance)>,
}

impl BoundArgs {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Instance)> + '_ {
        self.values.iter().map(|(name, value)| (*name, value))
    }

    /// Typed access to one bound argument
    pub fn get<T: Injectable>(&self, name: &str) -> Option<Arc<T>> {
        self.values
            .iter()
            .find(|(param, _)| *param == name)
            .and_then(|(_, value)| value.downcast().ok())
    }
}

/// Call-time parameter substitution for one managed callable.
///
/// Construction runs a non-strict finalize, so declaring managed
/// callables before the router or registry is wired up does not crash.
/// Retryable failures keep the resolver at the last stage it reached;
/// every later finalize attempt picks up from there.
pub struct ParameterResolver {
    state: ParamsState,
}

impl std::fmt::Debug for ParameterResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterResolver")
            .field("state", &self.state)
            .finish()
    }
}

impl ParameterResolver {
    pub fn new(signature: Signature, callback: ResolveCallback) -> Result<Self, AdvanceError> {
        let mut resolver = ParameterResolver {
            state: ParamsState::new(signature, callback),
        };
        resolver.try_finalize(false)?;
        Ok(resolver)
    }

    pub fn state(&self) -> &ParamsState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_final()
    }

    /// Advances the internal state as far as currently possible.
    ///
    /// With `strict` unset, retryable failures (forward references not
    /// yet evaluable, router not yet mounted, plugin not yet registered)
    /// halt the advance silently; they are expected to vanish once
    /// configuration completes. Fatal failures propagate in either mode.
    pub fn try_finalize(&mut self, strict: bool) -> Result<(), AdvanceError> {
        while !self.state.is_final() {
            match self.state.advance() {
                Ok(next) => self.state = next,
                Err(err) if err.is_retryable() => {
                    tracing::debug!(
                        stage = self.state.stage_name(),
                        reason = %err,
                        "Halted resolver finalization"
                    );
                    return if strict { Err(err) } else { Ok(()) };
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Binds caller arguments against the declared signature.
    ///
    /// Declared defaults are applied first, then caller arguments are
    /// overlaid: every hosted parameter the caller did not supply gets
    /// one fresh resolver invocation, and explicitly supplied arguments
    /// pass through untouched.
    pub fn bind(&mut self, args: CallArgs) -> Result<BoundArgs, BindError> {
        self.try_finalize(true)?;
        let final_state = self
            .state
            .as_final()
            .expect("strict finalize leaves the resolver final");

        let signature = final_state.signature();
        let target = signature.target();
        let params = signature.params();

        if args.positional.len() > params.len() {
            return Err(BindError::TooManyPositional {
                target,
                expected: params.len(),
                given: args.positional.len(),
            });
        }

        let mut assigned: Vec<Option<Instance>> = vec![None; params.len()];
        for (slot, value) in assigned.iter_mut().zip(args.positional) {
            *slot = Some(value);
        }

        for (name, value) in args.keyword {
            let index = params
                .iter()
                .position(|param| param.name() == name)
                .ok_or(BindError::UnknownParameter {
                    target,
                    param: name,
                })?;
            if assigned[index].is_some() {
                return Err(BindError::DuplicateParameter {
                    target,
                    param: name,
                });
            }
            assigned[index] = Some(value);
        }

        let resolver_map = final_state.resolver_map();
        let mut values = Vec::with_capacity(params.len());
        for (param, slot) in params.iter().zip(assigned) {
            let value = match slot {
                Some(value) => value,
                None => match param.default() {
                    ParamDefault::Hosted(_) => {
                        let resolver = resolver_map
                            .get(param.name())
                            .expect("hosted params have resolvers after finalize");
                        resolver()?
                    }
                    ParamDefault::Required => {
                        return Err(BindError::MissingArgument {
                            target,
                            param: param.name(),
                        })
                    }
                },
            };
            values.push((param.name(), value));
        }

        Ok(BoundArgs { values })
    }
}

/// A callable coupled with its parameter resolver.
///
/// Call sites invoke [`Managed::call`] with the same arguments the
/// original callable accepts; the bound argument set is produced first
/// and then handed to the target.
pub struct Managed<F> {
    resolver: ParameterResolver,
    target: F,
}

impl<F, R> Managed<F>
where
    F: Fn(&BoundArgs) -> R,
{
    pub fn new(resolver: ParameterResolver, target: F) -> Self {
        Managed { resolver, target }
    }

    pub fn call(&mut self, args: CallArgs) -> Result<R, BindError> {
        let bound = self.resolver.bind(args)?;
        Ok((self.target)(&bound))
    }
}
