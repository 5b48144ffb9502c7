/// Blog Service Library
///
/// A relational-backed REST API for the Quill blogging platform: users,
/// posts, comments, categories, tags, and session-cookie authentication.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and request DTOs
/// - `models`: Typed entities and role/status enums
/// - `services`: Business logic (auth, posts, comments, slug allocation)
/// - `db`: Repository layer over PostgreSQL
/// - `middleware`: Session-cookie authentication and authorization predicates
/// - `pagination`: Page/limit parsing and navigation metadata
/// - `jobs`: Background housekeeping (expired session sweep)
/// - `error`: Error types mapped to the response envelope
/// - `config`: Environment-driven configuration
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod response;
pub mod security;
pub mod services;
pub mod validators;

pub use config::Config;
pub use error::{AppError, Result};
