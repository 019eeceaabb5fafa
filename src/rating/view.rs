use std::sync::Arc;

use tokio::task::JoinHandle;

use super::{BookId, RatingAggregator, RatingSummary, ReviewSource};
use crate::stdx::slot::{Slot, Ticket};

/// Where a rating lookup currently stands, as seen by a screen.
///
/// `Pending` moves to either `Ready` or `Failed`, both of which are terminal
/// until a new lookup starts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RatingState {
    /// A lookup is in flight.
    #[default]
    Pending,
    /// The lookup finished with a summary.
    Ready(RatingSummary),
    /// The lookup failed; the rating stays unset.
    Failed,
}

impl RatingState {
    /// Returns `true` while a lookup is in flight.
    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns the summary, if the lookup finished successfully.
    #[inline]
    #[must_use]
    pub fn summary(&self) -> Option<&RatingSummary> {
        match self {
            Self::Ready(summary) => Some(summary),
            Self::Pending | Self::Failed => None,
        }
    }
}

/// The rating slot of a single screen.
///
/// A view starts out [`Pending`](RatingState::Pending), same as a screen that
/// fetches its rating as soon as it appears. Every [`load`](RatingView::load)
/// resets it to pending and only the most recent load may publish its result.
/// Once [`dismiss`](RatingView::dismiss)ed, nothing is published anymore, so a
/// response arriving after the screen is gone is dropped on the floor.
///
/// Clones share the same slot.
///
/// # Example
///
/// ```no_run
/// # use bookshelf::platform::supabase::Client;
/// # use bookshelf::rating::{BookId, RatingAggregator, RatingView};
/// # use std::sync::Arc;
/// # #[tokio::main]
/// # async fn main() -> anyhow::Result<()> {
/// let aggregator = Arc::new(RatingAggregator::new(Client::from_env()?));
/// let book: BookId = "Demon Copperhead".parse()?;
///
/// let view = RatingView::new();
/// let handle = view.spawn_load(Arc::clone(&aggregator), book);
///
/// // The screen stays interactive while the rating loads.
/// assert!(view.is_loading());
///
/// handle.await?;
/// println!("⭐ Rating: {}", view.average_display().unwrap_or_default());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RatingView {
    slot: Slot<RatingState>,
}

impl Default for RatingView {
    fn default() -> Self {
        Self::new()
    }
}

impl RatingView {
    /// Creates a view in the [`Pending`](RatingState::Pending) state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Slot::new(RatingState::Pending),
        }
    }

    /// Returns the current state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> RatingState {
        self.slot.get()
    }

    /// Returns `true` while a lookup is in flight and the view hasn't been dismissed.
    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        !self.is_dismissed() && self.state().is_loading()
    }

    /// Returns the text to show for the rating.
    ///
    /// This is `"<average> / 5"` or `"No ratings yet"` once a lookup succeeded,
    /// and `None` while loading or after a failure, where the rating is left blank.
    #[must_use]
    pub fn average_display(&self) -> Option<String> {
        self.state().summary().map(ToString::to_string)
    }

    /// Returns `true` once the view was dismissed.
    #[inline]
    #[must_use]
    pub fn is_dismissed(&self) -> bool {
        self.slot.is_closed()
    }

    /// Tears the view down. Lookups still in flight will not publish their results.
    ///
    /// The state is frozen as it was at dismissal, but the view no longer reports loading.
    pub fn dismiss(&self) {
        self.slot.close();
    }

    /// Resets the view to pending, looks up the rating of `book` and publishes the outcome.
    ///
    /// Returns whether the outcome was published. It is not when the view was
    /// dismissed, or when a newer load started in the meantime. A dismissed view
    /// doesn't issue a lookup at all.
    pub async fn load<S>(&self, aggregator: &RatingAggregator<S>, book: &BookId) -> bool
    where
        S: ReviewSource,
    {
        let Some(ticket) = self.slot.begin(RatingState::Pending) else {
            tracing::debug!(book = %book, "view dismissed, skipping rating lookup");
            return false;
        };

        self.run(ticket, aggregator, book).await
    }

    /// Same as [`load`](RatingView::load), but runs on the tokio runtime so the caller isn't blocked.
    ///
    /// The view is reset to pending before this returns.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    pub fn spawn_load<S>(&self, aggregator: Arc<RatingAggregator<S>>, book: BookId) -> JoinHandle<bool>
    where
        S: ReviewSource + 'static,
    {
        let Some(ticket) = self.slot.begin(RatingState::Pending) else {
            tracing::debug!(book = %book, "view dismissed, skipping rating lookup");
            return tokio::spawn(async { false });
        };

        let view = self.clone();

        tokio::spawn(async move { view.run(ticket, &aggregator, &book).await })
    }

    async fn run<S>(&self, ticket: Ticket, aggregator: &RatingAggregator<S>, book: &BookId) -> bool
    where
        S: ReviewSource,
    {
        // Failures are logged by the aggregator.
        let state = match aggregator.average_rating(book).await {
            Ok(summary) => RatingState::Ready(summary),
            Err(_) => RatingState::Failed,
        };

        let published = self.slot.settle(ticket, state);

        if !published {
            tracing::debug!(book = %book, "discarding stale rating lookup");
        }

        published
    }
}
