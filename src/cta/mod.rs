pub mod config;
pub mod context;
pub mod error;
pub mod kafka;
pub mod models;
pub mod schema;
pub mod serialization;
pub mod stream;
