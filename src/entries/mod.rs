pub mod models;
pub mod routes;

pub use models::{Entry, EntrySubmission, Pick, PickSubmission};
