use actix_identity::Identity;

use crate::errors::ServiceError;
use crate::users::User;

/// The logged in user, stored as json in the identity cookie.
///
/// The admin flag travels with the cookie so admin checks don't need a
/// database roundtrip; revoking admin rights therefore takes effect on the
/// next login.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub is_admin: bool,
}

/// start a session for the given user
pub fn remember(identity: &Identity, user: &User) -> Result<(), ServiceError> {
    let session = SessionUser {
        id: user.id,
        is_admin: user.is_admin,
    };

    let session = serde_json::to_string(&session).map_err(|err| {
        error!("unable to serialize the session cookie: {}", err);
        ServiceError::InternalServerError
    })?;

    identity.remember(session);

    Ok(())
}

pub fn forget(identity: &Identity) {
    identity.forget();
}

/// get the current authenticated session
/// returns Unauthorized when no session is found
pub fn get_user(identity: &Identity) -> Result<SessionUser, ServiceError> {
    match identity.identity() {
        Some(raw) => serde_json::from_str(&raw).map_err(|_| ServiceError::Unauthorized),
        None => Err(ServiceError::Unauthorized),
    }
}

pub fn get_user_id(identity: &Identity) -> Result<i64, ServiceError> {
    Ok(get_user(identity)?.id)
}

/// returns the session when it belongs to an administrator
pub fn verify_admin(identity: &Identity) -> Result<SessionUser, ServiceError> {
    let user = get_user(identity)?;

    if !user.is_admin {
        forbidden!("administrator access is required");
    }

    Ok(user)
}
