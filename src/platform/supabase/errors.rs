//! Errors that can happen when interacting with a Supabase project.

use thiserror::Error;

use crate::rating::errors::{InvalidBookId, RemoteQueryFailure};

#[allow(missing_docs)]
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    ClientError(#[from] ClientError),
    #[error(transparent)]
    RemoteQueryFailure(#[from] RemoteQueryFailure),
    #[error(transparent)]
    InvalidBookId(#[from] InvalidBookId),
}

#[allow(missing_docs)]
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("No project URL was provided")]
    MissingUrl,
    #[error("No API key was provided")]
    MissingApiKey,
    #[error("Environment variable `{0}` is not set")]
    MissingEnv(&'static str),
    #[error("{0}")]
    InvalidUrl(&'static str),
    #[error(transparent)]
    MalformedUrl(#[from] url::ParseError),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        Self::Unexpected(anyhow::Error::from(error))
    }
}
