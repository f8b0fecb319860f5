//! Database module: models, schema and storage for the dealership store.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: pool setup and the parameterized queries per table

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{DbListing, DbListingImage, DbUser, ListingDetail};
pub use schema::SQLITE_INIT;
pub use sqlite::{ListingFilter, ListingsStorage, SqlitePool, UsersStorage, connect};
