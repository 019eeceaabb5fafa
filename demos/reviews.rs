use bookshelf::{
    platform::supabase::{Client, errors::Error},
    rating::{BookId, RatingSummary},
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

    let client = Client::from_env()?;
    let reviews = client.reviews(&book).await?;

    for review in &reviews {
        let when = review
            .created_at()
            .map(|created_at| created_at.format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        println!("{} ⭐ {when}", review.rating());
        if let Some(text) = review.text() {
            println!("    {text}");
        }
    }

    let records: Vec<_> = reviews.iter().map(|review| review.record()).collect();
    println!("rating: {}", RatingSummary::from_records(&records));

    Ok(())
}
