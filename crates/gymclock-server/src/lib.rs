//! # Gymclock Passthrough Server
//!
//! Forwards HTTP requests to a managed Supabase data store for one
//! generic `todos` table. Independent of the timer crates at runtime.

pub mod routes;
pub mod supabase;

pub use routes::router;
pub use supabase::{DataStoreError, SupabaseClient};
