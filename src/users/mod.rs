mod models;

pub use models::{User, UserMessage, UserResponse};
