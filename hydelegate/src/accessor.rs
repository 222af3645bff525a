//! The accessor contract every delegate satisfies.
//!
//! A property read on the embedding object becomes [`ReadDelegate::read`] and a property write
//! becomes [`WriteDelegate::write`], each receiving the [`PropertyIdentity`] of the property
//! being accessed. A delegate that implements only [`ReadDelegate`] models a read-only property:
//! writing through it does not compile.

use std::{rc::Rc, sync::Arc};

use crate::{identity::PropertyIdentity, utils::error::DelegateResult};

/// Read half of the accessor contract.
///
/// Only map-backed delegates can fail here; every other delegate in this crate always returns
/// `Ok` and also offers an infallible inherent `get()`.
pub trait ReadDelegate<V> {
    fn read(&self, property: &PropertyIdentity) -> DelegateResult<V>;
}

/// Write half of the accessor contract.
pub trait WriteDelegate<V>: ReadDelegate<V> {
    fn write(&self, property: &PropertyIdentity, value: V) -> DelegateResult<()>;
}

macro_rules! forward_delegate {
    ($($ptr:ty),* $(,)?) => {
        $(
            impl<V, T: ReadDelegate<V> + ?Sized> ReadDelegate<V> for $ptr {
                #[inline]
                fn read(&self, property: &PropertyIdentity) -> DelegateResult<V> {
                    (**self).read(property)
                }
            }

            impl<V, T: WriteDelegate<V> + ?Sized> WriteDelegate<V> for $ptr {
                #[inline]
                fn write(&self, property: &PropertyIdentity, value: V) -> DelegateResult<()> {
                    (**self).write(property, value)
                }
            }
        )*
    };
}

forward_delegate!(&T, Box<T>, Arc<T>, Rc<T>);
