//! Observable and vetoable properties.
//!
//! Both are an [`ObservableProperty`]: a stored value plus a set of [`ChangeHooks`]. A write
//! runs the hooks in a fixed order:
//!
//! 1. `before_change(property, old, new)`; returning `false` rejects the write with
//!    [`RejectReason::VetoedByPolicy`], leaves the value untouched and fires nothing else,
//! 2. the new value is committed,
//! 3. `after_change(property, old, new)` observes the committed value.
//!
//! No lock is held while a hook runs, so hooks may read the property they observe. The
//! flip side is that writers racing on one slot can interleave freely; callers that need
//! ordered writes across threads must serialize them themselves.
//!
//! ```rust
//! use hydelegate::{observable, vetoable, PropertyIdentity, ReadDelegate, WriteDelegate};
//!
//! let max = vetoable(0, |_, old: &i32, new: &i32| new > old);
//! let id = PropertyIdentity::new("Script", "max");
//!
//! assert!(max.write(&id, 10).is_ok());
//! assert!(max.write(&id, 5).is_err());
//! assert_eq!(max.get(), 10);
//! ```

use std::fmt;

use log::debug;
use parking_lot::RwLock;

use crate::{
    accessor::{ReadDelegate, WriteDelegate},
    identity::PropertyIdentity,
    utils::error::{DelegateResult, RejectReason},
};

/// Callbacks run around every write to an [`ObservableProperty`].
pub trait ChangeHooks<V> {
    /// Decide whether the write may proceed. Runs before anything is mutated.
    fn before_change(&self, _property: &PropertyIdentity, _old: &V, _new: &V) -> bool {
        true
    }

    /// Observe a committed write.
    fn after_change(&self, _property: &PropertyIdentity, _old: &V, _new: &V) {}
}

/// Hooks that observe every committed write.
#[derive(Clone, Copy)]
pub struct Observe<F>(pub F);

/// Hooks that may reject a write before it happens.
#[derive(Clone, Copy)]
pub struct Veto<F>(pub F);

impl<V, F> ChangeHooks<V> for Observe<F>
where
    F: Fn(&PropertyIdentity, &V, &V),
{
    fn after_change(&self, property: &PropertyIdentity, old: &V, new: &V) {
        (self.0)(property, old, new);
    }
}

impl<V, F> ChangeHooks<V> for Veto<F>
where
    F: Fn(&PropertyIdentity, &V, &V) -> bool,
{
    fn before_change(&self, property: &PropertyIdentity, old: &V, new: &V) -> bool {
        (self.0)(property, old, new)
    }
}

impl<V> ChangeHooks<V> for () {}

impl<V, A: ChangeHooks<V>, B: ChangeHooks<V>> ChangeHooks<V> for (A, B) {
    fn before_change(&self, property: &PropertyIdentity, old: &V, new: &V) -> bool {
        self.0.before_change(property, old, new) && self.1.before_change(property, old, new)
    }

    fn after_change(&self, property: &PropertyIdentity, old: &V, new: &V) {
        self.0.after_change(property, old, new);
        self.1.after_change(property, old, new);
    }
}

/// A stored value whose writes go through [`ChangeHooks`].
///
/// Construction never invokes a hook.
pub struct ObservableProperty<V, H> {
    value: RwLock<V>,
    hooks: H,
}

/// Property that reports `(old, new)` after every successful write.
pub type Observable<V, F> = ObservableProperty<V, Observe<F>>;

/// Property whose handler accepts or rejects each write before it is applied.
pub type Vetoable<V, F> = ObservableProperty<V, Veto<F>>;

/// Build an [`Observable`] starting at `initial`.
pub fn observable<V, F>(initial: V, on_change: F) -> Observable<V, F>
where
    F: Fn(&PropertyIdentity, &V, &V),
{
    ObservableProperty::new(initial, Observe(on_change))
}

/// Build a [`Vetoable`] starting at `initial`.
pub fn vetoable<V, F>(initial: V, accept: F) -> Vetoable<V, F>
where
    F: Fn(&PropertyIdentity, &V, &V) -> bool,
{
    ObservableProperty::new(initial, Veto(accept))
}

impl<V, H: ChangeHooks<V>> ObservableProperty<V, H> {
    pub fn new(initial: V, hooks: H) -> Self {
        Self {
            value: RwLock::new(initial),
            hooks,
        }
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Attempt a write. See the module documentation for the hook order.
    ///
    /// If `after_change` panics the write has already been committed.
    pub fn set(&self, property: &PropertyIdentity, new: V) -> DelegateResult<()>
    where
        V: Clone,
    {
        let old = self.value.read().clone();
        if !self.hooks.before_change(property, &old, &new) {
            debug!("write to '{property}' vetoed");
            return Err(RejectReason::VetoedByPolicy {
                property: *property,
            });
        }

        let old = std::mem::replace(&mut *self.value.write(), new.clone());
        self.hooks.after_change(property, &old, &new);
        Ok(())
    }

    pub fn into_inner(self) -> V {
        self.value.into_inner()
    }
}

impl<V: Clone, H> ObservableProperty<V, H> {
    pub fn get(&self) -> V {
        self.value.read().clone()
    }
}

impl<V: fmt::Debug, H> fmt::Debug for ObservableProperty<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableProperty")
            .field("value", &*self.value.read())
            .field("hooks", &std::any::type_name::<H>())
            .finish()
    }
}

impl<V: Clone, H> ReadDelegate<V> for ObservableProperty<V, H> {
    fn read(&self, _property: &PropertyIdentity) -> DelegateResult<V> {
        Ok(self.get())
    }
}

impl<V: Clone, H: ChangeHooks<V>> WriteDelegate<V> for ObservableProperty<V, H> {
    fn write(&self, property: &PropertyIdentity, value: V) -> DelegateResult<()> {
        self.set(property, value)
    }
}
