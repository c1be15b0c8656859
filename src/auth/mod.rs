mod helpers;
pub mod routes;

pub use helpers::{forget, get_user, get_user_id, remember, verify_admin, SessionUser};
