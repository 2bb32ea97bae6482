#[macro_use]
extern crate diesel;

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod query;
pub mod reconcile;
pub mod recipes;
pub mod routes;
pub mod schema;

pub use db::DbPool;
pub use error::ApiError;
