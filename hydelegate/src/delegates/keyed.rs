//! Map-backed properties.
//!
//! A [`KeyedStore`] is a shared mapping from property name to value. Every delegate created from
//! it resolves its storage by looking up [`PropertyIdentity::name`] instead of owning a field.
//!
//! Handles are cheap clones of one underlying map. Two properties bound to the same store and
//! the same name therefore alias each other: a write through one is immediately visible through
//! the other. That is the point of map-backed storage, not an accident.
//!
//! Values are heterogeneous, so reading under the wrong type yields
//! [`RejectReason::TypeMismatch`].

use std::{
    any::{Any, type_name},
    collections::HashMap,
    fmt,
    sync::Arc,
};

use log::debug;
use parking_lot::RwLock;

use crate::{
    accessor::{ReadDelegate, WriteDelegate},
    identity::PropertyIdentity,
    utils::error::{DelegateResult, RejectReason},
};

type StoredValue = Box<dyn Any + Send + Sync>;
type Fallback<V> = Box<dyn Fn(&PropertyIdentity) -> V + Send + Sync>;

/// Shared name -> value mapping.
///
/// ```rust
/// use hydelegate::{KeyedStore, PropertyIdentity, ReadDelegate};
///
/// let map = KeyedStore::new()
///     .with("name", "John Doe".to_string())
///     .with("age", 25_u32);
///
/// let name = map.view::<String>();
/// let age = map.view::<u32>();
///
/// assert_eq!(name.read(&PropertyIdentity::new("User", "name")).unwrap(), "John Doe");
/// assert_eq!(age.read(&PropertyIdentity::new("User", "age")).unwrap(), 25);
/// ```
#[derive(Clone, Default)]
pub struct KeyedStore {
    entries: Arc<RwLock<HashMap<String, StoredValue>>>,
}

impl KeyedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`KeyedStore::insert`].
    pub fn with<V: Any + Send + Sync>(self, key: impl Into<String>, value: V) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or overwrite an entry. Returns `true` if an entry was replaced.
    pub fn insert<V: Any + Send + Sync>(&self, key: impl Into<String>, value: V) -> bool {
        self.entries
            .write()
            .insert(key.into(), Box::new(value))
            .is_some()
    }

    /// Typed lookup. `None` when the key is absent or holds another type.
    pub fn get<V: Any + Clone>(&self, key: &str) -> Option<V> {
        self.entries
            .read()
            .get(key)
            .and_then(|value| value.downcast_ref::<V>())
            .cloned()
    }

    pub fn remove(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Snapshot of the current keys, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    /// Whether two handles share the same underlying map.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }

    /// Read-write delegate over this store.
    pub fn entry<V>(&self) -> Keyed<V> {
        Keyed {
            binding: Binding::new(self.clone()),
        }
    }

    /// Read-only delegate over this store.
    pub fn view<V>(&self) -> KeyedView<V> {
        KeyedView {
            binding: Binding::new(self.clone()),
        }
    }

    fn lookup<V: Any + Clone>(&self, property: &PropertyIdentity) -> DelegateResult<Option<V>> {
        let entries = self.entries.read();
        let Some(value) = entries.get(property.name()) else {
            return Ok(None);
        };

        match value.downcast_ref::<V>() {
            Some(value) => Ok(Some(value.clone())),
            None => Err(RejectReason::TypeMismatch {
                property: *property,
                expected: type_name::<V>(),
            }),
        }
    }
}

impl<K: Into<String>, V: Any + Send + Sync> FromIterator<(K, V)> for KeyedStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let store = Self::new();
        for (key, value) in iter {
            store.insert(key, value);
        }
        store
    }
}

impl fmt::Debug for KeyedStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys = self.keys();
        keys.sort();
        f.debug_struct("KeyedStore").field("keys", &keys).finish()
    }
}

struct Binding<V> {
    store: KeyedStore,
    fallback: Option<Fallback<V>>,
}

impl<V> Binding<V> {
    fn new(store: KeyedStore) -> Self {
        Self {
            store,
            fallback: None,
        }
    }
}

impl<V: Any + Clone> Binding<V> {
    fn resolve(&self, property: &PropertyIdentity) -> DelegateResult<V> {
        if let Some(value) = self.store.lookup::<V>(property)? {
            return Ok(value);
        }

        match &self.fallback {
            Some(fallback) => Ok(fallback(property)),
            None => {
                debug!("no entry for '{property}' in keyed store");
                Err(RejectReason::MissingKey {
                    property: *property,
                })
            }
        }
    }
}

/// Read-write map-backed delegate.
pub struct Keyed<V> {
    binding: Binding<V>,
}

/// Read-only map-backed delegate. Has no write operation.
pub struct KeyedView<V> {
    binding: Binding<V>,
}

macro_rules! keyed_common {
    ($name:ident) => {
        impl<V> $name<V> {
            /// Compute a value from the identity instead of failing when the key is absent.
            ///
            /// The fallback is not written back to the store.
            pub fn with_default(
                mut self,
                fallback: impl Fn(&PropertyIdentity) -> V + Send + Sync + 'static,
            ) -> Self {
                self.binding.fallback = Some(Box::new(fallback));
                self
            }

            pub fn store(&self) -> &KeyedStore {
                &self.binding.store
            }
        }

        impl<V: Any + Clone> ReadDelegate<V> for $name<V> {
            fn read(&self, property: &PropertyIdentity) -> DelegateResult<V> {
                self.binding.resolve(property)
            }
        }

        impl<V> fmt::Debug for $name<V> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("store", &self.binding.store)
                    .field("value_type", &type_name::<V>())
                    .field("has_default", &self.binding.fallback.is_some())
                    .finish()
            }
        }
    };
}

keyed_common!(Keyed);
keyed_common!(KeyedView);

impl<V: Any + Clone + Send + Sync> WriteDelegate<V> for Keyed<V> {
    fn write(&self, property: &PropertyIdentity, value: V) -> DelegateResult<()> {
        self.binding.store.insert(property.name(), value);
        Ok(())
    }
}
