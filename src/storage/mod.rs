// Photo store: local filesystem persistence for uploaded photos

pub mod naming;
pub mod photo_store;

pub use naming::{sanitize_original_name, stored_name, validate_stored_name, NameGenerator};
pub use photo_store::PhotoStore;
