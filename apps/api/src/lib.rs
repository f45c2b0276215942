pub mod config;
pub mod cv;
pub mod db;
pub mod editor;
pub mod errors;
pub mod models;
pub mod routes;
pub mod state;
