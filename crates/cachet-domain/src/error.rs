//! Error handling types

use std::time::Duration;
use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for cachet
///
/// Every backend normalises its native miss signal into [`Error::NotFound`],
/// so callers can tell "absent" apart from "present but zero-valued".
#[derive(Error, Debug)]
pub enum Error {
    /// Key is absent from the store (or expired)
    #[error("Not found: {key}")]
    NotFound {
        /// The key that was not found
        key: String,
    },

    /// Value is present but cannot be interpreted as a number
    #[error("Invalid numeric value for {key}: {value}")]
    InvalidNumeric {
        /// The key whose value was read
        key: String,
        /// Short rendering of the offending value
        value: String,
    },

    /// A blocking lock attempt exceeded its wait budget
    #[error("Timed out after {waited:?} waiting for lock {name}")]
    LockWaitTimeout {
        /// Lock name
        name: String,
        /// Time spent polling before giving up
        waited: Duration,
    },

    /// The backend intentionally does not support the operation
    #[error("Operation {operation} is not implemented by the {backend} backend")]
    NotImplemented {
        /// Operation name
        operation: String,
        /// Backend name
        backend: String,
    },

    /// Opaque backend or transport failure, passed through unchanged
    #[error("Backend error: {message}")]
    Backend {
        /// Description of the backend error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Value encoding or decoding failure
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The store was closed and its connection released
    #[error("Store closed: {backend}")]
    StoreClosed {
        /// Backend name
        backend: String,
    },

    /// Several independent failures reported together
    #[error("Multiple errors: {}", join_errors(.errors))]
    Aggregate {
        /// The collected errors, in the order they occurred
        errors: Vec<Error>,
    },
}

fn join_errors(errors: &[Error]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// Lookup and value errors
impl Error {
    /// Create a not found error
    pub fn not_found<S: Into<String>>(key: S) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create an invalid numeric value error
    pub fn invalid_numeric<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        Self::InvalidNumeric {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a lock wait timeout error
    pub fn lock_wait_timeout<S: Into<String>>(name: S, waited: Duration) -> Self {
        Self::LockWaitTimeout {
            name: name.into(),
            waited,
        }
    }

    /// Create a not implemented error
    pub fn not_implemented<O: Into<String>, B: Into<String>>(operation: O, backend: B) -> Self {
        Self::NotImplemented {
            operation: operation.into(),
            backend: backend.into(),
        }
    }

    /// Create a store closed error
    pub fn store_closed<S: Into<String>>(backend: S) -> Self {
        Self::StoreClosed {
            backend: backend.into(),
        }
    }

    /// Combine errors into one, flattening when only one is present
    pub fn aggregate(mut errors: Vec<Error>) -> Self {
        if errors.len() == 1 {
            if let Some(error) = errors.pop() {
                return error;
            }
        }
        Self::Aggregate { errors }
    }
}

// Backend error creation methods
impl Error {
    /// Create a backend error
    pub fn backend<S: Into<String>>(message: S) -> Self {
        Self::Backend {
            message: message.into(),
            source: None,
        }
    }

    /// Create a backend error with source
    pub fn backend_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Backend {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Serialization error creation methods
impl Error {
    /// Create a serialization error
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        Self::Serialization {
            message: message.into(),
            source: None,
        }
    }

    /// Create a serialization error with source
    pub fn serialization_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Serialization {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Configuration error creation methods
impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Classification helpers
impl Error {
    /// True when the error is the normalised not-found condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True when a value was present but not numeric
    pub fn is_invalid_numeric(&self) -> bool {
        matches!(self, Self::InvalidNumeric { .. })
    }

    /// True when a blocking lock attempt ran out of time
    pub fn is_lock_timeout(&self) -> bool {
        matches!(self, Self::LockWaitTimeout { .. })
    }

    /// True when the backend does not implement the operation
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::serialization_with_source(format!("JSON error: {source}"), source)
    }
}
