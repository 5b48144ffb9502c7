/// HTTP handlers for the blog API
///
/// - `auth`: signup, login, logout (session cookie lifecycle)
/// - `posts`: CRUD with filters, draft visibility, slug allocation
/// - `comments`: CRUD with moderation and the reply tree
/// - `categories`/`tags`: taxonomy CRUD, admin-gated mutation
/// - `users`: public profiles and owner/admin profile updates
pub mod auth;
pub mod categories;
pub mod comments;
pub mod posts;
pub mod tags;
pub mod users;

pub use auth::{login, logout, signup};
pub use categories::{
    create_category, delete_category, get_category, get_category_by_slug, list_categories,
    update_category,
};
pub use comments::{create_comment, delete_comment, get_comments_by_post, update_comment};
pub use posts::{create_post, delete_post, get_post, list_posts, update_post};
pub use tags::{create_tag, delete_tag, get_tag, get_tag_by_slug, list_tags, update_tag};
pub use users::{get_profile, update_profile};
