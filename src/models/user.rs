use crate::schema::users;
use diesel::{Insertable, Queryable};

#[derive(Queryable)]
pub struct User {
    pub user_id: uuid::Uuid,
    pub email: String,
    pub password_hash: String,
    pub push_subscription: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub user_id: &'a uuid::Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
}
