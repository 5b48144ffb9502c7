/// Business logic layer for blog-service
///
/// - `auth`: signup, credential checks, session lifecycle
/// - `posts`: filtered listings and transactional create/update
/// - `comments`: moderation-aware listing and the reply-tree builder
/// - `slug`: text normalization and the slug uniqueness probe
pub mod auth;
pub mod comments;
pub mod posts;
pub mod slug;

pub use auth::AuthService;
pub use comments::{build_comment_tree, CommentService};
pub use posts::PostService;
pub use slug::{ensure_unique_slug, slugify, SlugScope};
