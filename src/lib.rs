/// Community Service Library
///
/// Backend for group-scoped community feeds: feeds with categories and
/// images, nested comment threads rendered with anonymized author labels,
/// and idempotent likes on feeds and comments.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `models`: Entity structs over the relational schema
/// - `services`: Business logic (listings, threads, anonymization, paging)
/// - `db`: Repository functions over PostgreSQL
/// - `middleware`: Bearer-token authentication and permission predicates
/// - `error`: Error types and HTTP mapping
/// - `config`: Configuration management
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
