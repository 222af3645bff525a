//! Type-erased binding between one property and its delegate.
//!
//! Embedding object models that want to hold delegates without naming their concrete types
//! attach each one as a [`DelegatedProperty`]. The identity is fixed at attachment time and
//! supplied on every access.

use std::fmt;

use crate::{
    accessor::{ReadDelegate, WriteDelegate},
    identity::PropertyIdentity,
    utils::error::{DelegateResult, RejectReason},
};

type ErasedRead<'a, V> = Box<dyn ReadDelegate<V> + Send + Sync + 'a>;
type ErasedWrite<'a, V> = Box<dyn WriteDelegate<V> + Send + Sync + 'a>;

enum Access<'a, V> {
    ReadOnly(ErasedRead<'a, V>),
    ReadWrite(ErasedWrite<'a, V>),
}

/// One delegated property: its identity plus exactly one delegate.
///
/// The erased form cannot reject writes at compile time, so [`DelegatedProperty::set`] on a
/// property attached with [`DelegatedProperty::read_only`] fails with
/// [`RejectReason::ReadOnlyTarget`].
///
/// ```rust
/// use hydelegate::{DelegatedProperty, LazyCache, PropertyIdentity, RejectReason, observable};
///
/// let greeting = DelegatedProperty::read_only(
///     PropertyIdentity::new("Greeter", "greeting"),
///     LazyCache::new(|| "hello".to_string()),
/// );
/// let name = DelegatedProperty::read_write(
///     PropertyIdentity::new("Greeter", "name"),
///     observable(String::new(), |_, _: &String, _: &String| {}),
/// );
///
/// name.set("world".to_string()).unwrap();
/// assert_eq!(name.get().unwrap(), "world");
/// assert!(matches!(
///     greeting.set("bye".to_string()),
///     Err(RejectReason::ReadOnlyTarget { .. })
/// ));
/// ```
pub struct DelegatedProperty<'a, V> {
    identity: PropertyIdentity,
    access: Access<'a, V>,
}

impl<'a, V> DelegatedProperty<'a, V> {
    pub fn read_only(
        identity: PropertyIdentity,
        delegate: impl ReadDelegate<V> + Send + Sync + 'a,
    ) -> Self {
        Self {
            identity,
            access: Access::ReadOnly(Box::new(delegate)),
        }
    }

    pub fn read_write(
        identity: PropertyIdentity,
        delegate: impl WriteDelegate<V> + Send + Sync + 'a,
    ) -> Self {
        Self {
            identity,
            access: Access::ReadWrite(Box::new(delegate)),
        }
    }

    pub fn identity(&self) -> &PropertyIdentity {
        &self.identity
    }

    pub fn is_writable(&self) -> bool {
        matches!(self.access, Access::ReadWrite(_))
    }

    pub fn get(&self) -> DelegateResult<V> {
        match &self.access {
            Access::ReadOnly(delegate) => delegate.read(&self.identity),
            Access::ReadWrite(delegate) => delegate.read(&self.identity),
        }
    }

    pub fn set(&self, value: V) -> DelegateResult<()> {
        match &self.access {
            Access::ReadOnly(_) => Err(RejectReason::ReadOnlyTarget {
                property: self.identity,
            }),
            Access::ReadWrite(delegate) => delegate.write(&self.identity, value),
        }
    }
}

impl<V> fmt::Debug for DelegatedProperty<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegatedProperty")
            .field("identity", &self.identity)
            .field("writable", &self.is_writable())
            .finish_non_exhaustive()
    }
}

// As a delegate, a bound property answers for its own identity, not the caller's.
impl<V> ReadDelegate<V> for DelegatedProperty<'_, V> {
    fn read(&self, _property: &PropertyIdentity) -> DelegateResult<V> {
        self.get()
    }
}

impl<V> WriteDelegate<V> for DelegatedProperty<'_, V> {
    fn write(&self, _property: &PropertyIdentity, value: V) -> DelegateResult<()> {
        self.set(value)
    }
}
