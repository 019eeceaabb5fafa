use std::{fmt::Display, ops::Deref, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};

use super::errors::InvalidBookId;

/// Identifies a book in the reviews table.
///
/// Matching is exact: no trimming, case folding or normalization happens
/// beyond refusing identifiers that are empty or only whitespace.
///
/// # Example
///
/// ```
/// # use bookshelf::rating::{BookId, errors::InvalidBookId};
/// let book: BookId = "The Heaven & Earth Grocery Store".parse()?;
/// assert_eq!("The Heaven & Earth Grocery Store", book.as_str());
///
/// assert_eq!(Err(InvalidBookId::Empty), "   ".parse::<BookId>());
/// # Ok::<(), InvalidBookId>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
#[serde(into = "String")]
pub struct BookId(Arc<str>);

impl BookId {
    /// Returns the identifier as it is matched against the data store.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for BookId {
    type Err = InvalidBookId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(InvalidBookId::Empty);
        }

        Ok(Self(Arc::from(s)))
    }
}

impl TryFrom<String> for BookId {
    type Error = InvalidBookId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl TryFrom<&str> for BookId {
    type Error = InvalidBookId;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_str(value)
    }
}

impl From<BookId> for String {
    fn from(val: BookId) -> Self {
        val.0.to_string()
    }
}

impl Deref for BookId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for BookId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for BookId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}
