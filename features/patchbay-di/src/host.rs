use std::marker::PhantomData;

use crate::types::{Injectable, Mark, TypeInfo};

/// Erased identity of a host: the subject type plus its ordered marks.
///
/// Two keys address the same binding target iff both the subject and the
/// mark sequence are equal. Hashing is structural and consistent with
/// equality, so a key can index a registry directly.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct HostKey {
    subject: TypeInfo,
    marks: Vec<Mark>,
}

impl HostKey {
    pub fn new(subject: TypeInfo, marks: Vec<Mark>) -> Self {
        HostKey { subject, marks }
    }

    pub fn subject(&self) -> TypeInfo {
        self.subject
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }
}

impl std::fmt::Display for HostKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.subject)?;
        if !self.marks.is_empty() {
            write!(f, " [")?;
            for (i, mark) in self.marks.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{mark}")?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

/// Typed slot for a value the runtime can supply.
///
/// A host is a value object: no identity beyond its fields, never mutated
/// after construction.
pub struct Host<T: ?Sized> {
    key: HostKey,
    _subject: PhantomData<fn() -> T>,
}

impl<T: Injectable> Host<T> {
    /// Host for a subject type with no marks
    pub fn new() -> Self {
        Host {
            key: HostKey::new(TypeInfo::of::<T>(), Vec::new()),
            _subject: PhantomData,
        }
    }

    /// Host with a single disambiguating mark
    pub fn marked(mark: impl Into<Mark>) -> Self {
        Self::with_marks([mark])
    }

    /// Host with an ordered sequence of marks
    pub fn with_marks<M: Into<Mark>>(marks: impl IntoIterator<Item = M>) -> Self {
        Host {
            key: HostKey::new(
                TypeInfo::of::<T>(),
                marks.into_iter().map(Into::into).collect(),
            ),
            _subject: PhantomData,
        }
    }

    pub fn key(&self) -> &HostKey {
        &self.key
    }

    pub fn into_key(self) -> HostKey {
        self.key
    }
}

impl<T: Injectable> Default for Host<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for Host<T> {
    fn clone(&self) -> Self {
        Host {
            key: self.key.clone(),
            _subject: PhantomData,
        }
    }
}

impl<T: ?Sized> std::fmt::Debug for Host<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Host").field(&self.key).finish()
    }
}
