use std::collections::HashMap;

use actix_identity::Identity;
use actix_web::web::{Data, Json};
use actix_web::{get, post, web};
use diesel::prelude::*;

use crate::auth;
use crate::db;
use crate::errors::ServiceError;
use crate::schema::schools;
use crate::server::Response;
use crate::validator::Validator;

#[derive(Debug, Serialize, Deserialize, Queryable, Identifiable, AsChangeset, Clone)]
pub struct School {
    pub id: i64,
    pub name: String,
    pub logo_id: Option<String>,
}

#[derive(Debug, Deserialize, Insertable)]
#[table_name = "schools"]
pub struct NewSchool {
    pub name: String,
    pub logo_id: Option<String>,
}

impl School {
    pub fn create(new_school: NewSchool, conn: &db::Conn) -> Result<School, ServiceError> {
        let school = diesel::insert_into(schools::table)
            .values(&new_school)
            .get_result(conn)?;

        Ok(school)
    }

    pub fn find_all(conn: &db::Conn) -> Result<Vec<School>, ServiceError> {
        let schools = schools::table.order(schools::name).load::<School>(conn)?;

        Ok(schools)
    }

    /// schools indexed by id, for resolving team names in bulk
    pub fn school_map(conn: &db::Conn) -> Result<HashMap<i64, School>, ServiceError> {
        let map = School::find_all(conn)?
            .into_iter()
            .map(|school| (school.id, school))
            .collect();

        Ok(map)
    }
}

impl crate::validator::Validate<NewSchool> for NewSchool {
    fn validate(&self) -> Result<(), ServiceError> {
        if self.name.trim().is_empty() {
            bad_request!("the school name is too short");
        }

        if self.name.trim().len() > 60 {
            bad_request!("the school name is too long, maximum 60 characters");
        }

        Ok(())
    }
}

#[get("/schools")]
async fn find_all(pool: Data<db::Pool>) -> Response {
    let conn = pool.get()?;

    let schools = web::block(move || School::find_all(&conn)).await?;

    http_ok_json!(schools);
}

#[post("/schools")]
async fn create(school: Json<Validator<NewSchool>>, id: Identity, pool: Data<db::Pool>) -> Response {
    auth::verify_admin(&id)?;

    let school = school.into_inner().validate()?;
    let conn = pool.get()?;

    let school = web::block(move || School::create(school, &conn)).await?;

    http_created_json!(school);
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(find_all);
    cfg.service(create);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::Validate;

    #[test]
    fn school_name_is_required() {
        let school = NewSchool {
            name: String::from("   "),
            logo_id: None,
        };

        assert!(school.validate().is_err());
    }

    #[test]
    fn regular_school_name_is_accepted() {
        let school = NewSchool {
            name: String::from("Michigan"),
            logo_id: Some(String::from("michigan")),
        };

        assert!(school.validate().is_ok());
    }
}
