//! Delegated-property runtime.
//!
//! A delegated property hands its storage and access semantics to a separate delegate object.
//! The embedding object model (out of scope here) holds one delegate per property and turns
//! every property read into [`ReadDelegate::read`] and every write into
//! [`WriteDelegate::write`], passing the [`PropertyIdentity`] of the property being accessed.
//!
//! Available delegates:
//! - [`LazyCache`]: computed on first read, cached forever, with three [`LazyMode`]s,
//! - [`Observable`] / [`Vetoable`] (both an [`ObservableProperty`]): notification after a
//!   write, or a veto before it,
//! - [`Keyed`] / [`KeyedView`]: storage looked up by property name in a shared [`KeyedStore`],
//! - [`Alias`]: forwarding to another delegate, a [`Field`] or a [`SharedCell`],
//! - [`Accessors`]: getter/setter functions with no storage at all.
//!
//! Outcomes that are not a plain success are reported as [`RejectReason`]; nothing is retried
//! or swallowed inside a delegate.

pub mod accessor;
pub mod delegates;
pub mod identity;
pub mod magic;
pub mod property;
pub mod utils;

pub use accessor::{ReadDelegate, WriteDelegate};
pub use delegates::{
    alias::{Accessors, Alias, Field, NoSetter, Setter, SharedCell},
    keyed::{Keyed, KeyedStore, KeyedView},
    lazy::{LazyCache, LazyMode, LazyState},
    observable::{
        ChangeHooks, Observable, ObservableProperty, Observe, Veto, Vetoable, observable, vetoable,
    },
};
pub use identity::PropertyIdentity;
pub use property::DelegatedProperty;
pub use utils::{
    conf::{DelegateConfig, LazyConfig},
    error::{ConfigError, ConfigResult, DelegateResult, RejectReason},
};
