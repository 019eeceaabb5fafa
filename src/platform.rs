//! Concrete data stores that reviews can be read from.

pub mod supabase;
