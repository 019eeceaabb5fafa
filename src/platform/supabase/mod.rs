//! An abstraction over a Supabase project's reviews table.
//!
//! Supabase exposes every Postgres table through PostgREST, so reading
//! reviews is a plain `GET` against `{project}/rest/v1/{table}` with
//! filters in the query string. The [`Client`] here only ever reads.

pub mod client;
pub mod errors;
pub mod review;

pub use client::{Aggregation, Client, ClientBuilder};
pub use review::Review;
