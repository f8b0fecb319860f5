pub mod credential_check;
pub mod financing;
pub mod image_store;
pub mod listing_read;
pub mod listing_write;
