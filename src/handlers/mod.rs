pub mod auth;
pub mod financing;
pub mod listings;
