/// Post handlers - HTTP endpoints for post operations
use crate::db::post_repo::{self, PostFilter};
use crate::error::{AppError, Result};
use crate::middleware::{self, CurrentUser, MaybeUser};
use crate::models::PostStatus;
use crate::pagination::{PageQuery, PaginationMeta};
use crate::response::ApiResponse;
use crate::services::posts::{NewPost, PostChanges};
use crate::services::{ensure_unique_slug, slugify, PostService, SlugScope};
use crate::validators;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}

impl ListPostsQuery {
    fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page.clone(),
            limit: self.limit.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Content is required"))]
    pub body: String,

    #[validate(custom(function = "validators::slug_validator"))]
    pub slug: Option<String>,

    pub status: PostStatus,

    #[serde(default)]
    pub category_ids: Vec<Uuid>,

    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Content is required"))]
    pub body: String,

    #[validate(custom(function = "validators::slug_validator"))]
    pub slug: Option<String>,

    pub status: PostStatus,

    pub category_ids: Option<Vec<Uuid>>,

    pub tag_ids: Option<Vec<Uuid>>,
}

fn parse_status_filter(raw: &str) -> Result<PostStatus> {
    match raw {
        "draft" => Ok(PostStatus::Draft),
        "published" => Ok(PostStatus::Published),
        _ => Err(AppError::BadRequest(
            "Status filter must be either 'draft' or 'published'".to_string(),
        )),
    }
}

/// List posts with filters and pagination. Anonymous and non-admin callers
/// only see published posts; admins may filter by status.
pub async fn list_posts(
    pool: web::Data<PgPool>,
    user: MaybeUser,
    query: web::Query<ListPostsQuery>,
) -> Result<HttpResponse> {
    let options = query.page_query().options();

    let status = if user.is_admin() {
        query.status.as_deref().map(parse_status_filter).transpose()?
    } else {
        Some(PostStatus::Published)
    };

    let filter = PostFilter {
        status,
        category_slug: query.category.clone().filter(|s| !s.is_empty()),
        tag_slug: query.tag.clone().filter(|s| !s.is_empty()),
        search: query.search.clone().filter(|s| !s.is_empty()),
    };

    let service = PostService::new((**pool).clone());
    let (posts, total) = service
        .list_posts(&filter, options.limit, options.offset)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Posts fetched successfully",
        serde_json::json!({
            "posts": posts,
            "pagination": PaginationMeta::new(total, options),
        }),
    )))
}

/// Fetch a single post. Drafts are only visible to their owner or an admin.
pub async fn get_post(
    pool: web::Data<PgPool>,
    user: MaybeUser,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let post = service
        .get_post_detail(*post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    if post.status == PostStatus::Draft {
        let viewer = user.0.ok_or_else(|| {
            AppError::Forbidden(
                "Access denied: You do not have permission to view this post".to_string(),
            )
        })?;
        middleware::require_owner_or_admin(
            &viewer,
            Some(post.user_id),
            "Access denied: You do not have permission to view this post",
        )?;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Post fetched successfully",
        serde_json::json!({ "post": post }),
    )))
}

/// Create a post (authors and admins)
pub async fn create_post(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    middleware::require_author(&user)?;
    req.validate()?;

    let base_source = match req.slug.as_deref() {
        Some(slug) if !slug.trim().is_empty() => slug,
        _ => req.title.as_str(),
    };
    let base = slugify(base_source)?;
    let slug = ensure_unique_slug(&pool, SlugScope::Posts, &base, None).await?;

    let service = PostService::new((**pool).clone());
    let post = service
        .create_post(NewPost {
            user_id: user.id,
            title: req.title.trim(),
            slug: &slug,
            body: &req.body,
            status: req.status,
            category_ids: &req.category_ids,
            tag_ids: &req.tag_ids,
        })
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(
        "Post created successfully",
        serde_json::json!({ "post": post }),
    )))
}

/// Update a post (owner or admin). The slug is re-allocated from the
/// provided slug or title, keeping the post's own slug when unchanged.
pub async fn update_post(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    post_id: web::Path<Uuid>,
    req: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    let existing = post_repo::find_with_author(&pool, *post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    middleware::require_owner_or_admin(
        &user,
        Some(existing.user_id),
        "Access denied: You do not own this post",
    )?;

    req.validate()?;

    let base_source = match req.slug.as_deref() {
        Some(slug) if !slug.trim().is_empty() => slug,
        _ => req.title.as_str(),
    };
    let base = slugify(base_source)?;
    let slug = ensure_unique_slug(&pool, SlugScope::Posts, &base, Some(*post_id)).await?;

    let service = PostService::new((**pool).clone());
    let post = service
        .update_post(
            *post_id,
            PostChanges {
                title: req.title.trim(),
                slug: &slug,
                body: &req.body,
                status: req.status,
                category_ids: req.category_ids.as_deref(),
                tag_ids: req.tag_ids.as_deref(),
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Post updated successfully",
        serde_json::json!({ "post": post }),
    )))
}

/// Delete a post (owner or admin)
pub async fn delete_post(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let existing = post_repo::find_with_author(&pool, *post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    middleware::require_owner_or_admin(
        &user,
        Some(existing.user_id),
        "Access denied: You do not own this post",
    )?;

    let service = PostService::new((**pool).clone());
    service.delete_post(*post_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Post deleted successfully",
        serde_json::json!({}),
    )))
}
