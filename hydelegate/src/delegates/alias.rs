//! Aliasing: forwarding a property to storage owned by someone else.
//!
//! [`Alias`] owns no storage. It forwards every read and write to a target delegate, which may
//! be a [`Field`] of the same object, a delegate held by another object, or a process-wide
//! [`SharedCell`]. The target must outlive the alias; holding it by reference makes the borrow
//! checker enforce that, holding it by [`Arc`] shares ownership instead.
//!
//! [`Field`] is the plain backing storage an aliased property points at, and [`Accessors`]
//! models a property with custom getter/setter bodies and no storage at all.

use std::{fmt, sync::Arc};

use parking_lot::RwLock;

use crate::{
    accessor::{ReadDelegate, WriteDelegate},
    identity::PropertyIdentity,
    utils::error::{DelegateResult, RejectReason},
};

/// Plain mutable storage for one value.
///
/// Each `get`/`set` is individually atomic; sequences of them are not.
pub struct Field<V> {
    value: RwLock<V>,
}

/// A single explicitly constructed cell shared by every holder of the handle.
///
/// This is the stand-in for a top-level mutable binding. Pass it around instead of reaching for
/// ambient global state so that tests can build isolated instances; a `static Field` remains
/// available when a genuine process-lifetime binding is wanted.
pub type SharedCell<V> = Arc<Field<V>>;

impl<V> Field<V> {
    pub const fn new(value: V) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    pub fn shared(value: V) -> SharedCell<V> {
        Arc::new(Self::new(value))
    }

    pub fn set(&self, value: V) {
        *self.value.write() = value;
    }

    /// Store `value` and hand back the previous one.
    pub fn replace(&self, value: V) -> V {
        std::mem::replace(&mut *self.value.write(), value)
    }

    /// Apply `f` to the stored value under the write lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut V) -> R) -> R {
        f(&mut self.value.write())
    }

    pub fn into_inner(self) -> V {
        self.value.into_inner()
    }
}

impl<V: Clone> Field<V> {
    pub fn get(&self) -> V {
        self.value.read().clone()
    }
}

impl<V: Default> Default for Field<V> {
    fn default() -> Self {
        Self::new(V::default())
    }
}

impl<V: fmt::Debug> fmt::Debug for Field<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Field").field(&*self.value.read()).finish()
    }
}

impl<V: Clone> ReadDelegate<V> for Field<V> {
    fn read(&self, _property: &PropertyIdentity) -> DelegateResult<V> {
        Ok(self.get())
    }
}

impl<V: Clone> WriteDelegate<V> for Field<V> {
    fn write(&self, _property: &PropertyIdentity, value: V) -> DelegateResult<()> {
        self.set(value);
        Ok(())
    }
}

/// Pure forwarding delegate.
///
/// By default the caller's identity is passed through to the target. [`Alias::renamed`] pins a
/// target identity instead, which matters when the target resolves storage by property name.
///
/// ```rust
/// use hydelegate::{Alias, Field, PropertyIdentity, WriteDelegate, ReadDelegate};
///
/// let member = Field::new(1);
/// let alias = Alias::new(&member);
/// let id = PropertyIdentity::new("MyClass", "delegatedToMember");
///
/// alias.write(&id, 5).unwrap();
/// assert_eq!(member.get(), 5);
/// member.set(7);
/// assert_eq!(alias.read(&id).unwrap(), 7);
/// ```
#[derive(Debug, Clone)]
pub struct Alias<T> {
    target: T,
    target_identity: Option<PropertyIdentity>,
}

impl<T> Alias<T> {
    pub const fn new(target: T) -> Self {
        Self {
            target,
            target_identity: None,
        }
    }

    pub const fn renamed(target: T, target_identity: PropertyIdentity) -> Self {
        Self {
            target,
            target_identity: Some(target_identity),
        }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    #[inline]
    fn forwarded<'a>(&'a self, property: &'a PropertyIdentity) -> &'a PropertyIdentity {
        self.target_identity.as_ref().unwrap_or(property)
    }
}

impl<V, T: ReadDelegate<V>> ReadDelegate<V> for Alias<T> {
    fn read(&self, property: &PropertyIdentity) -> DelegateResult<V> {
        self.target.read(self.forwarded(property))
    }
}

impl<V, T: WriteDelegate<V>> WriteDelegate<V> for Alias<T> {
    fn write(&self, property: &PropertyIdentity, value: V) -> DelegateResult<()> {
        self.target.write(self.forwarded(property), value)
    }
}

/// Setter half of [`Accessors`].
pub trait Setter<V> {
    fn set(&self, property: &PropertyIdentity, value: V) -> DelegateResult<()>;
}

impl<V, F: Fn(&PropertyIdentity, V)> Setter<V> for F {
    fn set(&self, property: &PropertyIdentity, value: V) -> DelegateResult<()> {
        self(property, value);
        Ok(())
    }
}

/// Setter of a getter-only [`Accessors`]: every write is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSetter;

impl<V> Setter<V> for NoSetter {
    fn set(&self, property: &PropertyIdentity, _value: V) -> DelegateResult<()> {
        Err(RejectReason::ReadOnlyTarget {
            property: *property,
        })
    }
}

/// A property made of accessor functions only, with no backing storage.
///
/// Without a setter the property is read-only at runtime: writes are rejected with
/// [`RejectReason::ReadOnlyTarget`]. This is the path an alias takes when its target was
/// declared read-only in a way the type system could not see.
pub struct Accessors<G, S = NoSetter> {
    getter: G,
    setter: S,
}

impl<G> Accessors<G> {
    pub fn getter(getter: G) -> Self {
        Self {
            getter,
            setter: NoSetter,
        }
    }
}

impl<G, S> Accessors<G, S> {
    pub fn new(getter: G, setter: S) -> Self {
        Self { getter, setter }
    }
}

impl<G, S> fmt::Debug for Accessors<G, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessors")
            .field("setter", &std::any::type_name::<S>())
            .finish_non_exhaustive()
    }
}

impl<V, G, S> ReadDelegate<V> for Accessors<G, S>
where
    G: Fn(&PropertyIdentity) -> V,
{
    fn read(&self, property: &PropertyIdentity) -> DelegateResult<V> {
        Ok((self.getter)(property))
    }
}

impl<V, G, S> WriteDelegate<V> for Accessors<G, S>
where
    G: Fn(&PropertyIdentity) -> V,
    S: Setter<V>,
{
    fn write(&self, property: &PropertyIdentity, value: V) -> DelegateResult<()> {
        self.setter.set(property, value)
    }
}
