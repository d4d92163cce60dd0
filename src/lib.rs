pub mod auth;
pub mod automation;
pub mod cache;
pub mod client;
pub mod config;
pub mod db;
pub mod generation;
pub mod handlers;
pub mod models;
pub mod realtime;
pub mod store;

pub use db::create_pool;
