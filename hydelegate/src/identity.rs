//! Static identity of a delegated property.
//!
//! Every call through the accessor contract carries a [`PropertyIdentity`]: the name of the
//! declaring type and the name of the property. Delegates use it as a lookup key (map-backed
//! storage), in rejection reasons, and in log lines. It is never mutated.

use std::fmt;

/// Immutable (declaring type, property name) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyIdentity {
    declaring_type: &'static str,
    name: &'static str,
}

impl PropertyIdentity {
    pub const fn new(declaring_type: &'static str, name: &'static str) -> Self {
        Self {
            declaring_type,
            name,
        }
    }

    /// Build an identity whose declaring type is the unqualified name of `T`.
    ///
    /// Only named path types (`a::b::Person`, `a::Wrapper<b::Inner>`) lose their module path.
    /// References, tuples, slices, arrays and other structural types keep the full
    /// [`type_name`](std::any::type_name).
    ///
    /// ```rust
    /// # use hydelegate::PropertyIdentity;
    /// struct Person;
    /// let id = PropertyIdentity::of::<Person>("name");
    /// assert_eq!(id.declaring_type(), "Person");
    /// ```
    pub fn of<T: ?Sized>(name: &'static str) -> Self {
        let full = std::any::type_name::<T>();
        if !full.starts_with(|c: char| c.is_alphabetic() || c == '_') {
            return Self::new(full, name);
        }

        // Strip the module path but keep generic arguments intact
        let base_end = full.find('<').unwrap_or(full.len());
        let start = full[..base_end].rfind("::").map(|i| i + 2).unwrap_or(0);
        Self::new(&full[start..], name)
    }

    pub const fn declaring_type(&self) -> &'static str {
        self.declaring_type
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for PropertyIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.declaring_type, self.name)
    }
}

/// Build a [`PropertyIdentity`] from a type path and a property name.
///
/// ```rust
/// # use hydelegate::{property_identity, PropertyIdentity};
/// const AGE: PropertyIdentity = property_identity!(User, age);
/// assert_eq!(AGE.to_string(), "User::age");
/// ```
#[macro_export]
macro_rules! property_identity {
    ($ty:ident, $name:ident) => {
        $crate::PropertyIdentity::new(stringify!($ty), stringify!($name))
    };
}
