pub mod api;
pub mod listing;
pub mod price;
