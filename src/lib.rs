pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod guards;
pub mod model;
pub mod models;
pub mod reconcile;
pub mod routes;
pub mod store;
pub mod utils;
