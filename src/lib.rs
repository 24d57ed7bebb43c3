pub mod cache;
pub mod db;
pub mod handlers;
pub mod models;
pub mod pricing;
pub mod ratelimit;
pub mod regen;
pub mod store;
