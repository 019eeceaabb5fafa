use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::BookId;
use crate::stdx::error::{InternalInvariant, invariant};

/// Text shown in place of an average when a book has no ratings yet.
pub const NO_RATINGS: &str = "No ratings yet";

/// One user-submitted rating for a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// The book this rating belongs to.
    pub book: BookId,
    /// The rating, conventionally on a `1..=5` scale.
    pub rating: f64,
}

impl ReviewRecord {
    /// Creates a new record.
    #[must_use]
    pub fn new(book: BookId, rating: f64) -> Self {
        Self { book, rating }
    }
}

/// The average rating of a book and the number of ratings it was computed from.
///
/// An average only exists when at least one rating does. With zero ratings the
/// summary reports [`NO_RATINGS`] rather than a number, so there is never a
/// `NaN` to guard against.
///
/// # Example
///
/// ```
/// # use bookshelf::rating::RatingSummary;
/// let summary = RatingSummary::from_ratings([5.0, 4.0, 3.0]);
/// assert_eq!(Some(4.0), summary.average());
/// assert_eq!(3, summary.sample_count());
/// assert_eq!("4.0 / 5", summary.to_string());
///
/// let summary = RatingSummary::from_ratings([]);
/// assert_eq!(None, summary.average());
/// assert_eq!("No ratings yet", summary.to_string());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RatingSummary {
    average: Option<f64>,
    sample_count: usize,
}

impl RatingSummary {
    /// A summary for a book nobody has rated.
    #[inline]
    #[must_use]
    pub const fn no_ratings() -> Self {
        Self {
            average: None,
            sample_count: 0,
        }
    }

    /// Reduces the given ratings into a summary.
    #[must_use]
    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let (sum, count) = ratings
            .into_iter()
            .fold((0.0, 0_usize), |(sum, count), rating| (sum + rating, count + 1));

        if count == 0 {
            return Self::no_ratings();
        }

        #[allow(clippy::cast_precision_loss, reason = "a book won't have 2^52 ratings")]
        let mean = sum / count as f64;

        Self {
            average: Some(round_to_tenth(mean)),
            sample_count: count,
        }
    }

    /// Reduces the ratings of the given records into a summary.
    #[must_use]
    pub fn from_records(records: &[ReviewRecord]) -> Self {
        Self::from_ratings(records.iter().map(|record| record.rating))
    }

    /// Builds a summary from an average and count that the data store computed itself.
    pub(crate) fn from_aggregate(
        average: Option<f64>,
        count: u64,
    ) -> Result<Self, InternalInvariant> {
        let Ok(sample_count) = usize::try_from(count) else {
            invariant!("rating count `{count}` does not fit in a usize");
        };

        match average {
            None => {
                invariant!(
                    sample_count == 0,
                    "average was null while {sample_count} ratings were counted"
                );
                Ok(Self::no_ratings())
            }
            Some(average) => {
                invariant!(
                    sample_count > 0,
                    "average was `{average}` while no ratings were counted"
                );
                Ok(Self {
                    average: Some(round_to_tenth(average)),
                    sample_count,
                })
            }
        }
    }

    /// Returns the average rounded to one decimal place, or `None` if there are no ratings.
    #[inline]
    #[must_use]
    pub fn average(&self) -> Option<f64> {
        self.average
    }

    /// Returns the number of ratings the summary was computed from.
    #[inline]
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Returns `true` if at least one rating exists.
    #[inline]
    #[must_use]
    pub fn has_ratings(&self) -> bool {
        self.sample_count > 0
    }
}

/// Renders either `"<average> / 5"` or [`NO_RATINGS`].
impl Display for RatingSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.average {
            Some(average) => write!(f, "{average:.1} / 5"),
            None => f.write_str(NO_RATINGS),
        }
    }
}

// Ties round away from zero.
fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
