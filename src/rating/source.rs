use std::future::Future;

use super::{BookId, RatingSummary, ReviewRecord, errors::RemoteQueryFailure};

/// Somewhere review records can be read from.
///
/// The aggregator only ever reads through this trait, so anything from the
/// hosted data store to an in-memory list can back it.
///
/// Implementors must provide [`ratings`](ReviewSource::ratings). Stores that
/// can compute the average and count themselves should also override
/// [`summary`](ReviewSource::summary), so only a single row crosses the wire.
pub trait ReviewSource: Send + Sync {
    /// Returns every record whose book identifier matches `book` exactly.
    fn ratings(
        &self,
        book: &BookId,
    ) -> impl Future<Output = Result<Vec<ReviewRecord>, RemoteQueryFailure>> + Send;

    /// Returns the rating summary for `book`.
    ///
    /// Defaults to fetching every record with [`ratings`](ReviewSource::ratings)
    /// and reducing them locally.
    fn summary(
        &self,
        book: &BookId,
    ) -> impl Future<Output = Result<RatingSummary, RemoteQueryFailure>> + Send {
        async move {
            let records = self.ratings(book).await?;
            Ok(RatingSummary::from_records(&records))
        }
    }
}

impl<S> ReviewSource for &S
where
    S: ReviewSource,
{
    fn ratings(
        &self,
        book: &BookId,
    ) -> impl Future<Output = Result<Vec<ReviewRecord>, RemoteQueryFailure>> + Send {
        (**self).ratings(book)
    }

    fn summary(
        &self,
        book: &BookId,
    ) -> impl Future<Output = Result<RatingSummary, RemoteQueryFailure>> + Send {
        (**self).summary(book)
    }
}

impl<S> ReviewSource for std::sync::Arc<S>
where
    S: ReviewSource,
{
    fn ratings(
        &self,
        book: &BookId,
    ) -> impl Future<Output = Result<Vec<ReviewRecord>, RemoteQueryFailure>> + Send {
        (**self).ratings(book)
    }

    fn summary(
        &self,
        book: &BookId,
    ) -> impl Future<Output = Result<RatingSummary, RemoteQueryFailure>> + Send {
        (**self).summary(book)
    }
}
