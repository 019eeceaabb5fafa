use std::{sync::Arc, time::Duration};

use bookshelf::{
    platform::supabase::{Aggregation, ClientBuilder, errors::Error},
    rating::{BookId, RatingAggregator, RatingView},
};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let book: BookId = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "The Heaven & Earth Grocery Store".to_owned())
        .parse()?;

    let aggregation = match std::env::var("BOOKSHELF_AGGREGATION").as_deref() {
        Ok("server") => Aggregation::ServerSide,
        _ => Aggregation::ClientSide,
    };

    let client = ClientBuilder::from_env()?.aggregation(aggregation).build()?;
    let aggregator = Arc::new(RatingAggregator::new(client).timeout(Duration::from_secs(5)));

    let view = RatingView::new();
    let handle = view.spawn_load(Arc::clone(&aggregator), book.clone());

    println!("title: {book}");
    println!("loading: {}", view.is_loading());

    let _published = handle.await;

    println!("loading: {}", view.is_loading());
    println!("rating: {}", view.average_display().unwrap_or_default());

    Ok(())
}
