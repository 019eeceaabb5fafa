pub mod error;
pub mod http;
pub mod serde;
pub mod slot;
