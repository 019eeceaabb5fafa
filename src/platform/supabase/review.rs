//! A single review as listed on a book's review page.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::client::Columns;
use crate::{
    rating::{BookId, ReviewRecord},
    stdx::{error::Invariant, serde::f64_from_number_or_string},
};

/// Represents a review left on a book.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    book: BookId,
    rating: f64,
    text: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

impl Review {
    /// Returns the book this review is for.
    #[inline]
    pub fn book(&self) -> &BookId {
        &self.book
    }

    /// Returns the rating that was given.
    #[inline]
    pub fn rating(&self) -> f64 {
        self.rating
    }

    /// Returns the written part of the review, if there is one.
    #[inline]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns when the review was submitted, if the table records it.
    #[inline]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Returns the review as a plain [`ReviewRecord`], dropping everything but the rating.
    #[must_use]
    pub fn record(&self) -> ReviewRecord {
        ReviewRecord::new(self.book.clone(), self.rating)
    }

    pub(super) fn from_row(
        mut row: Map<String, Value>,
        columns: &Columns,
    ) -> Result<Self, anyhow::Error> {
        let book = row
            .remove(&*columns.book)
            .invariant(format!("review row is missing the `{}` column", columns.book))?;
        let book: BookId = serde_json::from_value(book)?;

        let rating = row
            .remove(&*columns.rating)
            .invariant(format!("review row is missing the `{}` column", columns.rating))?;
        let rating = f64_from_number_or_string(rating)?;

        let text = match row.remove(&*columns.text) {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) if text.trim().is_empty() => None,
            Some(Value::String(text)) => Some(text),
            Some(other) => anyhow::bail!(
                "expected `{}` to be text, but found `{other}`",
                columns.text
            ),
        };

        let created_at = match row.remove(&*columns.created_at) {
            None | Some(Value::Null) => None,
            Some(value) => Some(serde_json::from_value::<DateTime<Utc>>(value)?),
        };

        Ok(Self {
            book,
            rating,
            text,
            created_at,
        })
    }
}
