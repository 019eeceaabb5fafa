//! Rating aggregation for a single book.
//!
//! A [`RatingAggregator`] asks a [`ReviewSource`] for every rating stored for
//! a [`BookId`], and reduces them into a [`RatingSummary`]. A [`RatingView`]
//! is the slot a screen binds to while that happens.
//!
//! # Example
//!
//! ```no_run
//! # use bookshelf::platform::supabase::Client;
//! # use bookshelf::rating::{BookId, RatingAggregator};
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let client = Client::from_env()?;
//! let aggregator = RatingAggregator::new(client);
//!
//! let book: BookId = "The Heaven & Earth Grocery Store".parse()?;
//! let summary = aggregator.average_rating(&book).await?;
//!
//! println!("⭐ {summary}");
//! # Ok(())
//! # }
//! ```

mod aggregator;
mod book;
pub mod errors;
mod source;
mod summary;
mod view;

pub use aggregator::{DEFAULT_TIMEOUT, RatingAggregator};
pub use book::BookId;
pub use source::ReviewSource;
pub use summary::{NO_RATINGS, RatingSummary, ReviewRecord};
pub use view::{RatingState, RatingView};
