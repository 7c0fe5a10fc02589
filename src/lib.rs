pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod seed;
pub mod voting;
