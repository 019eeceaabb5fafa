//! Errors that can happen while aggregating ratings.

use std::time::Duration;

use thiserror::Error;

use crate::stdx::error::InternalInvariant;

/// The one way a rating lookup can fail: the data store could not be read.
///
/// There is no retry and no partial result. Whoever started the lookup is
/// expected to clear its loading state and leave the rating unset.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RemoteQueryFailure {
    /// No response arrived within the configured timeout.
    #[error("data store did not respond within {0:?}")]
    TimedOut(Duration),
    /// The data store answered with a non-success status.
    #[error("data store responded with `{status}`: {message}")]
    Service {
        /// HTTP status code.
        status: u16,
        /// Error message reported by the data store, or its raw body.
        message: String,
    },
    /// The response could not be decoded into review records.
    #[error("malformed data store response: {0}")]
    Malformed(anyhow::Error),
    /// Transport level failure, e.g. DNS, TLS or a dropped connection.
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<reqwest::Error> for RemoteQueryFailure {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Malformed(anyhow::Error::from(error))
        } else {
            Self::Unexpected(anyhow::Error::from(error))
        }
    }
}

impl From<serde_json::Error> for RemoteQueryFailure {
    fn from(error: serde_json::Error) -> Self {
        Self::Malformed(anyhow::Error::from(error))
    }
}

impl From<InternalInvariant> for RemoteQueryFailure {
    fn from(error: InternalInvariant) -> Self {
        Self::Malformed(anyhow::Error::from(error))
    }
}

/// A book identifier was rejected.
#[allow(missing_docs)]
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidBookId {
    #[error("book identifier cannot be empty")]
    Empty,
}
