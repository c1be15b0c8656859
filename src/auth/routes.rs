use actix_identity::Identity;
use actix_web::http::StatusCode;
use actix_web::web::{Data, Json};
use actix_web::{get, post, web, HttpResponse};
use serde_json::json;

use crate::auth;
use crate::db;
use crate::errors::ServiceError;
use crate::server::Response;
use crate::users::{User, UserMessage, UserResponse};
use crate::validator::Validator;

#[post("/auth/register")]
async fn register(
    user: Json<Validator<UserMessage>>,
    id: Identity,
    pool: Data<db::Pool>,
) -> Response {
    let mut user = user.into_inner().validate()?;
    let conn = pool.get()?;

    let user = web::block(move || User::create(&mut user, &conn)).await?;

    auth::remember(&id, &user)?;

    http_created_json!(UserResponse {
        id: user.id,
        username: user.username,
    });
}

#[post("/auth/login")]
async fn login(credentials: Json<UserMessage>, id: Identity, pool: Data<db::Pool>) -> Response {
    let conn = pool.get()?;
    let credentials = credentials.into_inner();

    let user = web::block(move || {
        let user = User::find_by_username(credentials.username, &conn).map_err(
            |error| match error {
                // hide whether the username exists
                ServiceError::NotFound => ServiceError::Unauthorized,
                _ => error,
            },
        )?;

        user.verify_password(credentials.password.as_bytes())?;

        Ok(user)
    })
    .await?;

    auth::remember(&id, &user)?;

    http_ok_json!(UserResponse {
        id: user.id,
        username: user.username,
    });
}

#[derive(Debug, Deserialize)]
struct PasswordChange {
    current_password: String,
    new_password: String,
}

#[post("/auth/password")]
async fn change_password(
    change: Json<PasswordChange>,
    id: Identity,
    pool: Data<db::Pool>,
) -> Response {
    let session = auth::get_user(&id)?;
    let change = change.into_inner();

    if change.new_password.len() < 8 {
        bad_request!("your password should at least be 8 characters long");
    }

    let conn = pool.get()?;
    web::block(move || {
        let mut user = User::find_by_id(session.id, &conn)?;
        user.verify_password(change.current_password.as_bytes())?;

        user.password = change.new_password;
        user.update_password(&conn)
    })
    .await?;

    Ok(HttpResponse::new(StatusCode::OK))
}

#[post("/auth/logout")]
async fn logout(id: Identity) -> Response {
    auth::get_user(&id)?;

    auth::forget(&id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Successfully signed out" })))
}

#[get("/auth/me")]
async fn me(id: Identity, pool: Data<db::Pool>) -> Response {
    let session = auth::get_user(&id)?;

    let conn = pool.get()?;
    let user = web::block(move || User::find_by_id(session.id, &conn)).await;

    match user {
        Ok(user) => {
            http_ok_json!(UserResponse {
                id: user.id,
                username: user.username,
            });
        }
        // the user was deleted after the cookie was issued
        Err(_) => Ok(HttpResponse::new(StatusCode::UNAUTHORIZED)),
    }
}

pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register);
    cfg.service(login);
    cfg.service(change_password);
    cfg.service(logout);
    cfg.service(me);
}
