use serde::Deserialize;

use crate::{
    rating::{BookId, RatingSummary, ReviewRecord, errors::RemoteQueryFailure},
    stdx::{
        error::{Invariant, invariant},
        serde::{f64_from_number_or_string, option_f64_from_number_or_string},
    },
};

/// Alias the rating column is selected under, whatever its real name.
pub const RATING: &str = "rating";
pub const AVERAGE: &str = "average";
pub const COUNT: &str = "count";

#[derive(Deserialize)]
pub struct RatingRow {
    #[serde(deserialize_with = "f64_from_number_or_string")]
    rating: f64,
}

impl RatingRow {
    pub fn into_record(self, book: &BookId) -> ReviewRecord {
        ReviewRecord::new(book.clone(), self.rating)
    }
}

/// Single row returned by an `avg()`/`count()` select without any grouping.
#[derive(Deserialize)]
pub struct AggregateRow {
    #[serde(deserialize_with = "option_f64_from_number_or_string")]
    average: Option<f64>,
    count: u64,
}

pub fn summary_from_rows(rows: Vec<AggregateRow>) -> Result<RatingSummary, RemoteQueryFailure> {
    if rows.len() > 1 {
        invariant!(
            "aggregate query should return exactly one row, but returned {}",
            rows.len()
        );
    }

    let row = rows
        .into_iter()
        .next()
        .invariant("aggregate query should always return a row, even without ratings")?;

    RatingSummary::from_aggregate(row.average, row.count).map_err(RemoteQueryFailure::from)
}
