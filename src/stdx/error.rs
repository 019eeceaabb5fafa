use thiserror::Error;

macro_rules! invariant {
    ($msg:literal $(, $args:expr)* ) => {{
        return Err($crate::stdx::error::InternalInvariant::from(format!($msg $(, $args)*)).into());
    }};
    ($cond:expr, $msg:literal $(, $args:expr)* ) => {{
        if !$cond {
            return Err($crate::stdx::error::InternalInvariant::from(format!("`{}`, {}", stringify!($cond), format!($msg $(, $args)*))).into());
        }
    }};
}

pub(crate) use invariant;

/// Represents assumptions about the data store's responses that did not hold.
///
/// These are never caused by caller input. They surface to callers as
/// [`RemoteQueryFailure::Malformed`](crate::rating::errors::RemoteQueryFailure::Malformed),
/// since a response that breaks them cannot be trusted.
#[derive(Debug, Error)]
#[error("internal invariant violated: {0}")]
pub struct InternalInvariant(String);

impl From<String> for InternalInvariant {
    #[inline]
    fn from(msg: String) -> Self {
        Self(msg)
    }
}

pub trait Invariant<T> {
    type Output;

    fn invariant(self, msg: impl Into<String>) -> Self::Output;
}

impl<T> Invariant<T> for Option<T> {
    type Output = Result<T, InternalInvariant>;

    #[inline]
    fn invariant(self, msg: impl Into<String>) -> Self::Output {
        self.ok_or_else(|| InternalInvariant(msg.into()))
    }
}
