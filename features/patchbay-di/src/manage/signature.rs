use std::sync::Arc;

use crate::types::{Injectable, Mark, TypeInfo};

/// Marker default for a parameter the runtime should supply.
///
/// Carries only disambiguation marks; the parameter's subject type comes
/// from the declaration next to it.
#[derive(Debug, Clone, Default)]
pub struct HostedMark {
    marks: Vec<Mark>,
}

impl HostedMark {
    pub fn new() -> Self {
        HostedMark { marks: Vec::new() }
    }

    pub fn marked(mark: impl Into<Mark>) -> Self {
        HostedMark {
            marks: vec![mark.into()],
        }
    }

    pub fn with_marks<M: Into<Mark>>(marks: impl IntoIterator<Item = M>) -> Self {
        HostedMark {
            marks: marks.into_iter().map(Into::into).collect(),
        }
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }
}

/// Shorthand for an unmarked [`HostedMark`]
pub fn hosted() -> HostedMark {
    HostedMark::new()
}

/// Shorthand for a [`HostedMark`] with one mark
pub fn hosted_marked(mark: impl Into<Mark>) -> HostedMark {
    HostedMark::marked(mark)
}

/// What the declaration site said about a parameter's type.
///
/// `Typed` captures static type information right where the signature is
/// declared. `Deferred` stands in for a subject that is not nameable yet;
/// its thunk is consulted on every advance attempt until it yields.
#[derive(Clone)]
pub enum Subject {
    /// Nothing was declared
    Empty,
    /// Captured at the declaration site
    Typed(TypeInfo),
    /// Forward declaration, evaluated late
    Deferred {
        symbol: &'static str,
        resolve: Arc<dyn Fn() -> Option<TypeInfo> + Send + Sync>,
    },
}

impl Subject {
    pub fn of<T: Injectable>() -> Self {
        Subject::Typed(TypeInfo::of::<T>())
    }

    pub fn deferred(
        symbol: &'static str,
        resolve: impl Fn() -> Option<TypeInfo> + Send + Sync + 'static,
    ) -> Self {
        Subject::Deferred {
            symbol,
            resolve: Arc::new(resolve),
        }
    }
}

impl std::fmt::Debug for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Subject::Empty => f.write_str("Empty"),
            Subject::Typed(info) => f.debug_tuple("Typed").field(info).finish(),
            Subject::Deferred { symbol, .. } => {
                f.debug_struct("Deferred").field("symbol", symbol).finish()
            }
        }
    }
}

/// Default behavior of a declared parameter
#[derive(Debug, Clone)]
pub enum ParamDefault {
    /// The caller must supply this parameter on every call
    Required,
    /// The runtime supplies a value unless the caller overrides it
    Hosted(HostedMark),
}

/// One declared parameter of a managed callable
#[derive(Debug, Clone)]
pub struct Param {
    name: &'static str,
    subject: Subject,
    default: ParamDefault,
}

impl Param {
    /// Parameter the caller always supplies; no subject is needed
    pub fn required(name: &'static str) -> Self {
        Param {
            name,
            subject: Subject::Empty,
            default: ParamDefault::Required,
        }
    }

    /// Hosted parameter with its subject captured from static type info
    pub fn hosted<T: Injectable>(name: &'static str, mark: HostedMark) -> Self {
        Param {
            name,
            subject: Subject::of::<T>(),
            default: ParamDefault::Hosted(mark),
        }
    }

    /// Hosted parameter with an explicitly declared subject, for
    /// forward-declared types
    pub fn hosted_with(name: &'static str, subject: Subject, mark: HostedMark) -> Self {
        Param {
            name,
            subject,
            default: ParamDefault::Hosted(mark),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn default(&self) -> &ParamDefault {
        &self.default
    }
}

/// Declared call surface of a managed callable
#[derive(Debug, Clone)]
pub struct Signature {
    target: &'static str,
    params: Vec<Param>,
}

impl Signature {
    pub fn of(target: &'static str) -> Self {
        Signature {
            target,
            params: Vec::new(),
        }
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn target(&self) -> &'static str {
        self.target
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }
}
