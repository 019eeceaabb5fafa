//! Represents a client abstraction for a Supabase project's reviews table.

mod ratings;

use crate::{
    rating::{BookId, RatingSummary, ReviewRecord, ReviewSource, errors::RemoteQueryFailure},
    stdx::http::{DEFAULT_USER_AGENT, IServiceStatus},
};

use super::{Review, errors::ClientError};
use anyhow::Context;
use reqwest::Response;
use serde_json::{Map, Value};
use std::{fmt, sync::Arc};
use url::Url;

/// Environment variable [`ClientBuilder::from_env`] reads the project URL from.
pub const URL_ENV: &str = "SUPABASE_URL";
/// Environment variable [`ClientBuilder::from_env`] reads the API key from.
pub const API_KEY_ENV: &str = "SUPABASE_ANON_KEY";

/// Where the average rating of a book gets computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aggregation {
    /// Fetch every rating of the book and average them locally.
    ///
    /// Works against any project, at the cost of transferring every row.
    #[default]
    ClientSide,
    /// Ask PostgREST for `avg()` and `count()` directly, so a single row is transferred.
    ///
    /// Requires aggregate functions to be enabled for the project's API
    /// (`pgrst.db_aggregates_enabled`). Projects without it answer with an error.
    ServerSide,
}

/// Column names of the reviews table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Columns {
    pub(super) book: Arc<str>,
    pub(super) rating: Arc<str>,
    pub(super) text: Arc<str>,
    pub(super) created_at: Arc<str>,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            book: Arc::from("book_name"),
            rating: Arc::from("rating"),
            text: Arc::from("review"),
            created_at: Arc::from("created_at"),
        }
    }
}

#[derive(Clone)]
struct ApiKey(Arc<str>);

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(..)")
    }
}

/// A builder for configuring and creating instances of [`Client`] with custom settings.
///
/// A project URL and an API key are required; everything else has a default
/// matching a `book_reviews` table with `book_name` and `rating` columns.
///
/// # Example
///
/// ```
/// # use bookshelf::platform::supabase::{Aggregation, ClientBuilder};
/// let client = ClientBuilder::new()
///     .url("https://abcdefghijklmnop.supabase.co")
///     .api_key("public-anon-key")
///     .table("reviews")
///     .rating_column("stars")
///     .aggregation(Aggregation::ServerSide)
///     .build()?;
/// # Ok::<(), bookshelf::platform::supabase::errors::ClientError>(())
/// ```
#[derive(Debug)]
pub struct ClientBuilder {
    builder: reqwest::ClientBuilder,
    url: Option<String>,
    api_key: Option<ApiKey>,
    table: Arc<str>,
    columns: Columns,
    aggregation: Aggregation,
}

impl Default for ClientBuilder {
    #[must_use]
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    ///
    /// This includes a default user agent (`bookshelf/VERSION`), but no project URL or API key.
    #[must_use]
    pub fn new() -> Self {
        let builder = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .use_rustls_tls()
            .brotli(true);

        Self {
            builder,
            url: None,
            api_key: None,
            table: Arc::from("book_reviews"),
            columns: Columns::default(),
            aggregation: Aggregation::default(),
        }
    }

    /// Creates a `ClientBuilder` with the project URL and API key taken from
    /// the `SUPABASE_URL` and `SUPABASE_ANON_KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingEnv`] if either variable isn't set.
    pub fn from_env() -> Result<Self, ClientError> {
        let url = std::env::var(URL_ENV).map_err(|_err| ClientError::MissingEnv(URL_ENV))?;
        let api_key =
            std::env::var(API_KEY_ENV).map_err(|_err| ClientError::MissingEnv(API_KEY_ENV))?;

        Ok(Self::new().url(&url).api_key(&api_key))
    }

    /// Sets the project URL, e.g. `https://<project>.supabase.co`.
    #[must_use]
    pub fn url(self, url: &str) -> Self {
        Self {
            url: Some(url.to_owned()),
            ..self
        }
    }

    /// Sets the API key, sent as both the `apikey` header and a bearer token.
    #[must_use]
    pub fn api_key(self, api_key: &str) -> Self {
        Self {
            api_key: Some(ApiKey(api_key.into())),
            ..self
        }
    }

    /// Sets the table reviews are stored in. Defaults to `book_reviews`.
    #[must_use]
    pub fn table(self, table: &str) -> Self {
        Self {
            table: table.into(),
            ..self
        }
    }

    /// Sets the column holding the book identifier. Defaults to `book_name`.
    #[must_use]
    pub fn book_column(mut self, column: &str) -> Self {
        self.columns.book = column.into();
        self
    }

    /// Sets the column holding the rating. Defaults to `rating`.
    #[must_use]
    pub fn rating_column(mut self, column: &str) -> Self {
        self.columns.rating = column.into();
        self
    }

    /// Sets the column holding the written review. Defaults to `review`.
    #[must_use]
    pub fn text_column(mut self, column: &str) -> Self {
        self.columns.text = column.into();
        self
    }

    /// Sets the column holding the submission time. Defaults to `created_at`.
    #[must_use]
    pub fn created_at_column(mut self, column: &str) -> Self {
        self.columns.created_at = column.into();
        self
    }

    /// Sets where averages get computed. Defaults to [`Aggregation::ClientSide`].
    #[must_use]
    pub fn aggregation(self, aggregation: Aggregation) -> Self {
        Self {
            aggregation,
            ..self
        }
    }

    /// Sets a custom `User-Agent` header for the [`Client`].
    ///
    /// By default, the user agent is set to `bookshelf/VERSION`.
    #[must_use]
    pub fn user_agent(self, user_agent: &str) -> Self {
        Self {
            builder: self.builder.user_agent(user_agent),
            ..self
        }
    }

    /// Consumes the `ClientBuilder` and returns a fully-configured [`Client`].
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] if the URL or API key is missing or unusable,
    /// or if the underlying HTTP client could not be built, such as when TLS
    /// initialization fails.
    pub fn build(self) -> Result<Client, ClientError> {
        let url = self.url.ok_or(ClientError::MissingUrl)?;
        let api_key = self.api_key.ok_or(ClientError::MissingApiKey)?;

        if api_key.0.trim().is_empty() {
            return Err(ClientError::MissingApiKey);
        }

        if self.table.trim().is_empty() {
            return Err(ClientError::InvalidUrl("reviews table name cannot be empty"));
        }

        let endpoint = endpoint(&url, &self.table)?;

        Ok(Client {
            http: self.builder.build()?,
            endpoint: Arc::new(endpoint),
            api_key,
            columns: Arc::new(self.columns),
            aggregation: self.aggregation,
        })
    }
}

fn endpoint(url: &str, table: &str) -> Result<Url, ClientError> {
    let mut endpoint = Url::parse(url)?;

    if !matches!(endpoint.scheme(), "http" | "https") {
        return Err(ClientError::InvalidUrl(
            "Supabase project URL must use `http` or `https`",
        ));
    }

    endpoint.set_query(None);
    endpoint.set_fragment(None);

    endpoint
        .path_segments_mut()
        .map_err(|()| ClientError::InvalidUrl("Supabase project URL cannot be a base"))?
        .pop_if_empty()
        .extend(["rest", "v1", table]);

    Ok(endpoint)
}

/// A high-level, asynchronous client to read reviews from a Supabase project.
///
/// Cloning is cheap, and clones share the same connection pool.
///
/// # Example
///
/// ```no_run
/// # use bookshelf::platform::supabase::{Client, errors::Error};
/// # use bookshelf::rating::{BookId, ReviewSource};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Error> {
/// let client = Client::from_env()?;
/// let book: BookId = "The Heaven & Earth Grocery Store".parse()?;
///
/// let summary = client.summary(&book).await?;
/// println!("⭐ Rating: {summary}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    endpoint: Arc<Url>,
    api_key: ApiKey,
    columns: Arc<Columns>,
    aggregation: Aggregation,
}

// Creation impls
impl Client {
    /// Builds a [`Client`] from the `SUPABASE_URL` and `SUPABASE_ANON_KEY` environment variables.
    ///
    /// # Errors
    ///
    /// See [`ClientBuilder::from_env`] and [`ClientBuilder::build`].
    pub fn from_env() -> Result<Self, ClientError> {
        ClientBuilder::from_env()?.build()
    }

    /// Returns a [`ClientBuilder`] for creating a custom-configured `Client`.
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }
}

// Public facing impls
impl Client {
    /// Returns the reviews of `book`, newest first.
    ///
    /// Columns other than the book, rating, text and submission time are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteQueryFailure`] if the table cannot be read or a row doesn't look like a review.
    pub async fn reviews(&self, book: &BookId) -> Result<Vec<Review>, RemoteQueryFailure> {
        let order = format!("{}.desc.nullslast", self.columns.created_at);
        let url = self.query(book, "*", Some(&order));

        let rows: Vec<Map<String, Value>> = self.get(url).await?.json().await?;

        let mut reviews = Vec::with_capacity(rows.len());

        for (idx, row) in rows.into_iter().enumerate() {
            let review = Review::from_row(row, &self.columns)
                .with_context(|| format!("failed to read review row {idx} for `{book}`"))
                .map_err(RemoteQueryFailure::Malformed)?;

            reviews.push(review);
        }

        Ok(reviews)
    }

    /// Returns where this client computes averages.
    #[inline]
    pub fn aggregation(&self) -> Aggregation {
        self.aggregation
    }
}

impl ReviewSource for Client {
    async fn ratings(&self, book: &BookId) -> Result<Vec<ReviewRecord>, RemoteQueryFailure> {
        let select = format!("{}:{}", ratings::RATING, self.columns.rating);
        let url = self.query(book, &select, None);

        let rows: Vec<ratings::RatingRow> = self.get(url).await?.json().await?;

        Ok(rows.into_iter().map(|row| row.into_record(book)).collect())
    }

    async fn summary(&self, book: &BookId) -> Result<RatingSummary, RemoteQueryFailure> {
        match self.aggregation {
            Aggregation::ClientSide => {
                let records = self.ratings(book).await?;
                Ok(RatingSummary::from_records(&records))
            }
            Aggregation::ServerSide => {
                let url = self.query(book, &self.aggregate_select(), None);

                let rows: Vec<ratings::AggregateRow> = self.get(url).await?.json().await?;

                ratings::summary_from_rows(rows)
            }
        }
    }
}

// Internal only impls
impl Client {
    fn aggregate_select(&self) -> String {
        let column = &self.columns.rating;
        format!(
            "{}:{column}.avg(),{}:{column}.count()",
            ratings::AVERAGE,
            ratings::COUNT
        )
    }

    /// `GET {endpoint}?select={select}&{book_column}=eq.{book}[&order={order}]`
    fn query(&self, book: &BookId, select: &str, order: Option<&str>) -> Url {
        let mut url = Url::clone(&self.endpoint);

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("select", select)
                .append_pair(&self.columns.book, &format!("eq.{book}"));

            if let Some(order) = order {
                query.append_pair("order", order);
            }
        }

        url
    }

    async fn get(&self, url: Url) -> Result<Response, RemoteQueryFailure> {
        tracing::debug!(url = %url, "querying data store");

        let response = self
            .http
            .get(url)
            .header("apikey", &*self.api_key.0)
            .bearer_auth(&self.api_key.0)
            .header("Accept", "application/json")
            .send()
            .await?;

        response.or_service_error().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_str_eq;

    fn client() -> Client {
        Client::builder()
            .url("https://abcdefghijklmnop.supabase.co")
            .api_key("anon")
            .build()
            .unwrap()
    }

    #[test]
    fn should_build_rest_endpoint() {
        assert_str_eq!(
            "https://abcdefghijklmnop.supabase.co/rest/v1/book_reviews",
            client().endpoint.as_str()
        );

        let url = endpoint("http://localhost:54321/?x=1#frag", "reviews").unwrap();
        assert_str_eq!("http://localhost:54321/rest/v1/reviews", url.as_str());
    }

    #[test]
    fn should_keep_project_path_prefix() {
        let url = endpoint("https://example.com/supabase/", "book_reviews").unwrap();
        assert_str_eq!("https://example.com/supabase/rest/v1/book_reviews", url.as_str());
    }

    #[test]
    fn should_reject_bad_configuration() {
        assert!(matches!(
            ClientBuilder::new().api_key("anon").build(),
            Err(ClientError::MissingUrl)
        ));
        assert!(matches!(
            ClientBuilder::new().url("https://example.com").build(),
            Err(ClientError::MissingApiKey)
        ));
        assert!(matches!(
            ClientBuilder::new().url("https://example.com").api_key(" ").build(),
            Err(ClientError::MissingApiKey)
        ));
        assert!(matches!(
            ClientBuilder::new().url("not a url").api_key("anon").build(),
            Err(ClientError::MalformedUrl(_))
        ));
        assert!(matches!(
            ClientBuilder::new().url("ftp://example.com").api_key("anon").build(),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn should_encode_exact_match_filter() {
        let client = client();
        let book: BookId = "The Heaven & Earth Grocery Store".parse().unwrap();

        let url = client.query(&book, "rating:rating", None);

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        assert_eq!(
            vec![
                ("select".to_owned(), "rating:rating".to_owned()),
                (
                    "book_name".to_owned(),
                    "eq.The Heaven & Earth Grocery Store".to_owned()
                ),
            ],
            pairs
        );
        assert!(
            url.query().unwrap().contains("eq.The+Heaven+%26+Earth+Grocery+Store"),
            "`&` must be escaped: {url}"
        );
    }

    #[test]
    fn should_select_server_side_aggregates() {
        let client = Client::builder()
            .url("https://example.com")
            .api_key("anon")
            .aggregation(Aggregation::ServerSide)
            .build()
            .unwrap();
        let book: BookId = "Dune".parse().unwrap();

        let select = client.aggregate_select();
        assert_str_eq!("average:rating.avg(),count:rating.count()", select);

        let url = client.query(&book, &select, None);
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        assert_eq!(
            vec![
                (
                    "select".to_owned(),
                    "average:rating.avg(),count:rating.count()".to_owned()
                ),
                ("book_name".to_owned(), "eq.Dune".to_owned()),
            ],
            pairs
        );
    }

    #[test]
    fn should_aggregate_configured_rating_column() {
        let client = Client::builder()
            .url("https://example.com")
            .api_key("anon")
            .rating_column("stars")
            .build()
            .unwrap();

        assert_str_eq!(
            "average:stars.avg(),count:stars.count()",
            client.aggregate_select()
        );
    }

    #[test]
    fn should_use_configured_columns_and_order() {
        let client = Client::builder()
            .url("https://example.com")
            .api_key("anon")
            .table("reviews")
            .book_column("title")
            .created_at_column("inserted_at")
            .build()
            .unwrap();
        let book: BookId = "Dune".parse().unwrap();

        let url = client.query(&book, "*", Some("inserted_at.desc.nullslast"));

        assert_str_eq!(
            "https://example.com/rest/v1/reviews?select=*&title=eq.Dune&order=inserted_at.desc.nullslast",
            url.as_str()
        );
    }

    #[test]
    fn should_not_leak_api_key_in_debug() {
        let debug = format!("{:?}", client());
        assert!(!debug.contains("\"anon\""), "{debug}");
        assert!(debug.contains("ApiKey(..)"), "{debug}");
    }

    #[test]
    fn should_default_to_client_side_aggregation() {
        assert_eq!(Aggregation::ClientSide, client().aggregation());
    }
}
