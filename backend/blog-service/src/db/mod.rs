/// Database access layer
///
/// Repository modules expose free async functions over `&PgPool` (or an open
/// transaction) and return `sqlx` results; business-level error mapping
/// happens in the services and handlers.
pub mod category_repo;
pub mod comment_repo;
pub mod post_repo;
pub mod session_repo;
pub mod tag_repo;
pub mod user_repo;
