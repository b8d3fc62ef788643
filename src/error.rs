//! Failure conditions raised by the hash engine and the collections.

/// Both variants are fatal where they originate: the hash engine and
/// [`HashMap::must_get`](crate::HashMap::must_get) panic with the variant's
/// message. [`HashMap::try_get`](crate::HashMap::try_get) hands
/// [`Error::KeyNotFound`] back to callers that prefer to branch on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The value belongs to a category with no structural hashing rule.
    #[error("can't calculate hash for \"{type_name}\"")]
    UnsupportedKind { type_name: &'static str },
    /// No entry is stored under the key.
    #[error("hashmap: key not found: {key}")]
    KeyNotFound { key: String },
}

impl Error {
    pub(crate) fn unsupported<T: ?Sized>() -> Self {
        Error::UnsupportedKind {
            type_name: std::any::type_name::<T>(),
        }
    }

    pub(crate) fn key_not_found(key: &impl std::fmt::Debug) -> Self {
        Error::KeyNotFound {
            key: format!("{key:?}"),
        }
    }
}
