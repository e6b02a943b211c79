pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod routes;
pub mod state;
pub mod templates;
pub mod validation;
pub mod wizard;

mod sync;
