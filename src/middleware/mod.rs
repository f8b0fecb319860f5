pub mod extract;
pub mod listing_form;
