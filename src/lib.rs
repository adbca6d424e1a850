#[macro_use]
extern crate rocket;

pub mod catchers;
pub mod configuration;
pub mod domain;
pub mod error;
pub mod guards;
pub mod migrations;
pub mod models;
pub mod push;
pub mod routes;
pub mod scheduler;
pub mod schema;
pub mod startup;
pub mod store;
pub mod telemetry;
