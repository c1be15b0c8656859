use std::collections::HashMap;

use actix_identity::Identity;
use actix_web::web::{Data, Json};
use actix_web::{get, post, web};
use diesel::prelude::*;

use crate::auth;
use crate::db;
use crate::errors::ServiceError;
use crate::schema::bowls;
use crate::server::Response;
use crate::validator::Validator;

#[derive(Debug, Serialize, Deserialize, Queryable, Identifiable, AsChangeset, Clone)]
pub struct Bowl {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub stadium_name: String,
}

#[derive(Debug, Deserialize, Insertable)]
#[table_name = "bowls"]
pub struct NewBowl {
    pub name: String,
    pub city: String,
    pub state: String,
    pub stadium_name: String,
}

impl Bowl {
    pub fn create(new_bowl: NewBowl, conn: &db::Conn) -> Result<Bowl, ServiceError> {
        let bowl = diesel::insert_into(bowls::table)
            .values(&new_bowl)
            .get_result(conn)?;

        Ok(bowl)
    }

    pub fn find_all(conn: &db::Conn) -> Result<Vec<Bowl>, ServiceError> {
        let bowls = bowls::table.order(bowls::name).load::<Bowl>(conn)?;

        Ok(bowls)
    }

    pub fn bowl_map(conn: &db::Conn) -> Result<HashMap<i64, Bowl>, ServiceError> {
        let map = Bowl::find_all(conn)?
            .into_iter()
            .map(|bowl| (bowl.id, bowl))
            .collect();

        Ok(map)
    }
}

impl crate::validator::Validate<NewBowl> for NewBowl {
    fn validate(&self) -> Result<(), ServiceError> {
        if self.name.trim().is_empty() {
            bad_request!("the bowl name is too short");
        }

        if self.name.trim().len() > 60 {
            bad_request!("the bowl name is too long, maximum 60 characters");
        }

        if self.city.trim().is_empty() || self.state.trim().is_empty() {
            bad_request!("the bowl location is incomplete");
        }

        Ok(())
    }
}

#[get("/bowls")]
async fn find_all(pool: Data<db::Pool>) -> Response {
    let conn = pool.get()?;

    let bowls = web::block(move || Bowl::find_all(&conn)).await?;

    http_ok_json!(bowls);
}

#[post("/bowls")]
async fn create(bowl: Json<Validator<NewBowl>>, id: Identity, pool: Data<db::Pool>) -> Response {
    auth::verify_admin(&id)?;

    let bowl = bowl.into_inner().validate()?;
    let conn = pool.get()?;

    let bowl = web::block(move || Bowl::create(bowl, &conn)).await?;

    http_created_json!(bowl);
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(find_all);
    cfg.service(create);
}
