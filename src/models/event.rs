use crate::schema::events;
use chrono::offset::Utc;
use chrono::DateTime;
use diesel::{Insertable, Queryable};

#[derive(Queryable)]
pub struct Event {
    pub event_id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub title: String,
    pub start_time: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = events)]
pub struct NewEvent<'a> {
    pub event_id: &'a uuid::Uuid,
    pub user_id: &'a uuid::Uuid,
    pub title: &'a str,
    pub start_time: &'a DateTime<Utc>,
}
