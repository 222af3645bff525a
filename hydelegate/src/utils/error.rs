use thiserror::Error;

use crate::identity::PropertyIdentity;

/// Outcome of a delegate access that did not go through.
///
/// Delegates never retry or swallow these; the embedding object model decides whether to
/// surface them, substitute a default, or retry with another value.
///
/// A fourth hazard, an unsynchronized race on a [`LazyMode::None`](crate::LazyMode::None)
/// cache, is a documented precondition rather than a runtime-detected error and therefore has
/// no variant here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// A vetoing handler declined the write. The stored value is unchanged.
    #[error("write to '{property}' was vetoed by policy")]
    VetoedByPolicy { property: PropertyIdentity },

    /// The keyed store has no entry for the property name.
    #[error("key '{}' is missing from the backing store (property '{property}')", .property.name())]
    MissingKey { property: PropertyIdentity },

    /// A write reached a delegate that only supports reads.
    #[error("property '{property}' is read-only")]
    ReadOnlyTarget { property: PropertyIdentity },

    /// The keyed store holds a value of a different type under the property name.
    #[error("entry for '{property}' is not of type `{expected}`")]
    TypeMismatch {
        property: PropertyIdentity,
        expected: &'static str,
    },
}

impl RejectReason {
    /// The property the rejected access was made through.
    pub fn property(&self) -> &PropertyIdentity {
        match self {
            RejectReason::VetoedByPolicy { property }
            | RejectReason::MissingKey { property }
            | RejectReason::ReadOnlyTarget { property }
            | RejectReason::TypeMismatch { property, .. } => property,
        }
    }
}

pub type DelegateResult<T> = Result<T, RejectReason>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration file '{file}': {source}")]
    ParseError {
        source: toml::de::Error,
        file: String,
    },

    #[error("Failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
