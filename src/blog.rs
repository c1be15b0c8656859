use actix_identity::Identity;
use actix_web::web::{Data, Json, Path};
use actix_web::{get, post, web};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::auth;
use crate::db;
use crate::errors::ServiceError;
use crate::schema::blog_posts;
use crate::server::Response;
use crate::validator::Validator;

/// A daily write-up from the commissioners.
#[derive(Debug, Serialize, Deserialize, Queryable, Identifiable, Clone)]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub posted_by: String,
    pub year: i32,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Insertable)]
#[table_name = "blog_posts"]
pub struct NewBlogPost {
    pub title: String,
    pub body: String,
    #[serde(skip)]
    pub posted_by: String,
    #[serde(skip)]
    pub year: i32,
}

impl BlogPost {
    pub fn create(new_post: NewBlogPost, conn: &db::Conn) -> Result<BlogPost, ServiceError> {
        let post = diesel::insert_into(blog_posts::table)
            .values(&new_post)
            .get_result(conn)?;

        Ok(post)
    }

    pub fn find_by_year(year: i32, conn: &db::Conn) -> Result<Vec<BlogPost>, ServiceError> {
        let posts = blog_posts::table
            .filter(blog_posts::year.eq(year))
            .order(blog_posts::created_at.desc())
            .load::<BlogPost>(conn)?;

        Ok(posts)
    }
}

impl crate::validator::Validate<NewBlogPost> for NewBlogPost {
    fn validate(&self) -> Result<(), ServiceError> {
        if self.title.trim().is_empty() {
            bad_request!("the post needs a title");
        }

        if self.body.trim().is_empty() {
            bad_request!("the post needs a body");
        }

        Ok(())
    }
}

#[get("/blog/{year}")]
async fn find_by_year(year: Path<i32>, pool: Data<db::Pool>) -> Response {
    let conn = pool.get()?;

    let posts = web::block(move || BlogPost::find_by_year(*year, &conn)).await?;

    http_ok_json!(posts);
}

#[post("/blog")]
async fn create(post: Json<Validator<NewBlogPost>>, id: Identity, pool: Data<db::Pool>) -> Response {
    auth::verify_admin(&id)?;

    let mut post = post.into_inner().validate()?;
    post.year = crate::config::Config::contest_year();

    let conn = pool.get()?;

    // stamp the author from the session user
    let session = auth::get_user(&id)?;
    let post = web::block(move || {
        let author = crate::users::User::find_by_id(session.id, &conn)?;
        let post = NewBlogPost {
            posted_by: author.username,
            ..post
        };
        BlogPost::create(post, &conn)
    })
    .await?;

    http_created_json!(post);
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(find_by_year);
    cfg.service(create);
}
