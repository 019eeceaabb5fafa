#![allow(clippy::ignore_without_reason)]
//! Runs against a live project. Needs `SUPABASE_URL` and `SUPABASE_ANON_KEY`,
//! and optionally `BOOKSHELF_TEST_BOOK` naming a book that has reviews.

use bookshelf::{
    platform::supabase::{Aggregation, Client, ClientBuilder, errors::Error},
    rating::{BookId, RatingAggregator, RatingSummary, ReviewSource},
};

fn book() -> BookId {
    std::env::var("BOOKSHELF_TEST_BOOK")
        .unwrap_or_else(|_| "The Heaven & Earth Grocery Store".to_owned())
        .parse()
        .expect("`BOOKSHELF_TEST_BOOK` should not be empty")
}

#[tokio::test]
#[ignore]
async fn ratings() -> Result<(), Error> {
    let client = Client::from_env()?;
    let book = book();

    let records = client.ratings(&book).await?;
    for record in &records {
        assert_eq!(book, record.book);
        assert!(record.rating.is_finite());
    }

    let summary = RatingAggregator::new(client).average_rating(&book).await?;
    assert_eq!(records.len(), summary.sample_count());
    println!("{book}: {summary}");

    Ok(())
}

#[tokio::test]
#[ignore]
async fn unknown_book_has_no_ratings() -> Result<(), Error> {
    let client = Client::from_env()?;
    let book: BookId = "a book nobody has ever reviewed, hopefully".parse()?;

    let summary = client.summary(&book).await?;
    assert_eq!(RatingSummary::no_ratings(), summary);

    Ok(())
}

#[tokio::test]
#[ignore]
async fn reviews_agree_with_ratings() -> Result<(), Error> {
    let client = Client::from_env()?;
    let book = book();

    let reviews = client.reviews(&book).await?;
    let records: Vec<_> = reviews.iter().map(|review| review.record()).collect();

    assert_eq!(RatingSummary::from_records(&records), client.summary(&book).await?);

    let mut dates = reviews.iter().filter_map(|review| review.created_at());
    if let Some(mut previous) = dates.next() {
        for date in dates {
            assert!(date <= previous, "reviews should be newest first");
            previous = date;
        }
    }

    Ok(())
}

#[tokio::test]
#[ignore = "requires `pgrst.db_aggregates_enabled` on the project"]
async fn server_side_matches_client_side() -> Result<(), Error> {
    let book = book();

    let client_side = ClientBuilder::from_env()?.build()?;
    let server_side = ClientBuilder::from_env()?
        .aggregation(Aggregation::ServerSide)
        .build()?;

    assert_eq!(client_side.summary(&book).await?, server_side.summary(&book).await?);

    Ok(())
}

#[tokio::test]
#[ignore]
async fn missing_table_is_a_service_error() -> Result<(), Error> {
    let client = ClientBuilder::from_env()?.table("no_such_table_here").build()?;

    let err = client.ratings(&book()).await.unwrap_err();
    assert!(
        matches!(
            err,
            bookshelf::rating::errors::RemoteQueryFailure::Service { status: 400..=404, .. }
        ),
        "{err:?}"
    );

    Ok(())
}
