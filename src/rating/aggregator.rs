use std::time::Duration;

use super::{BookId, RatingSummary, ReviewSource, errors::RemoteQueryFailure};

/// How long a single remote read may take before it is reported as failed.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Computes the average rating of a book from a [`ReviewSource`].
///
/// The aggregator holds no state between calls. Asking twice with the same
/// backing data yields the same summary.
///
/// # Example
///
/// ```no_run
/// # use bookshelf::platform::supabase::Client;
/// # use bookshelf::rating::{BookId, RatingAggregator};
/// # use std::time::Duration;
/// # #[tokio::main]
/// # async fn main() -> anyhow::Result<()> {
/// let aggregator = RatingAggregator::new(Client::from_env()?) //
///     .timeout(Duration::from_secs(3));
///
/// let book: BookId = "Tomorrow, and Tomorrow, and Tomorrow".parse()?;
///
/// match aggregator.average_rating(&book).await {
///     Ok(summary) => println!("{summary} ({} ratings)", summary.sample_count()),
///     Err(err) => eprintln!("rating unavailable: {err}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RatingAggregator<S> {
    source: S,
    timeout: Duration,
}

impl<S> RatingAggregator<S>
where
    S: ReviewSource,
{
    /// Creates an aggregator reading from `source`, with a [`DEFAULT_TIMEOUT`].
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets how long a remote read may take before failing with
    /// [`RemoteQueryFailure::TimedOut`].
    #[must_use]
    pub fn timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    /// Returns the source this aggregator reads from.
    #[inline]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Computes the [`RatingSummary`] of `book`.
    ///
    /// A book without ratings is not an error: the summary reports
    /// [`NO_RATINGS`](super::NO_RATINGS) instead.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteQueryFailure`] if the source cannot be read or does not
    /// answer in time. The failure is logged before it is returned, and is
    /// never retried.
    pub async fn average_rating(&self, book: &BookId) -> Result<RatingSummary, RemoteQueryFailure> {
        tracing::debug!(book = %book, timeout = ?self.timeout, "fetching average rating");

        let result = match tokio::time::timeout(self.timeout, self.source.summary(book)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(RemoteQueryFailure::TimedOut(self.timeout)),
        };

        match &result {
            Ok(summary) => tracing::debug!(
                book = %book,
                count = summary.sample_count(),
                average = ?summary.average(),
                "computed average rating"
            ),
            Err(err) => tracing::error!(book = %book, error = %err, "error fetching average rating"),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::ReviewRecord;
    use pretty_assertions::assert_eq;

    struct Fixed(Vec<f64>);

    impl ReviewSource for Fixed {
        async fn ratings(&self, book: &BookId) -> Result<Vec<ReviewRecord>, RemoteQueryFailure> {
            Ok(self
                .0
                .iter()
                .map(|rating| ReviewRecord::new(book.clone(), *rating))
                .collect())
        }
    }

    struct Stalled;

    impl ReviewSource for Stalled {
        async fn ratings(&self, _: &BookId) -> Result<Vec<ReviewRecord>, RemoteQueryFailure> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn should_use_default_summary() {
        let aggregator = RatingAggregator::new(Fixed(vec![5.0, 4.0, 3.0]));
        let book: BookId = "X".parse().unwrap();

        let summary = aggregator.average_rating(&book).await.unwrap();
        assert_eq!(Some(4.0), summary.average());
        assert_eq!(3, summary.sample_count());
    }

    #[tokio::test(start_paused = true)]
    async fn should_time_out_stalled_source() {
        let aggregator = RatingAggregator::new(Stalled).timeout(Duration::from_millis(250));
        let book: BookId = "X".parse().unwrap();

        let err = aggregator.average_rating(&book).await.unwrap_err();
        assert!(
            matches!(err, RemoteQueryFailure::TimedOut(timeout) if timeout == Duration::from_millis(250)),
            "{err:?}"
        );
    }

    #[test]
    fn should_default_timeout() {
        let aggregator = RatingAggregator::new(Fixed(vec![]));
        assert_eq!(DEFAULT_TIMEOUT, aggregator.timeout);
    }
}
