/// Comment handlers - HTTP endpoints for comment operations
use crate::db::{comment_repo, post_repo};
use crate::error::{AppError, Result};
use crate::middleware::{self, CurrentUser, MaybeUser};
use crate::models::Role;
use crate::response::ApiResponse;
use crate::services::CommentService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 1000, message = "Comment must be between 1 and 1000 characters"))]
    pub body: String,

    pub parent_comment_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = 1000, message = "Comment must be between 1 and 1000 characters"))]
    pub body: String,
}

/// Create a comment on a post. New comments await moderation.
pub async fn create_comment(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    post_id: web::Path<Uuid>,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    post_repo::find_with_author(&pool, *post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let service = CommentService::new((**pool).clone());
    let comment = service
        .create_comment(*post_id, user.id, req.body.trim(), req.parent_comment_id)
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(
        "Comment created successfully and is pending approval",
        serde_json::json!({ "comment": comment }),
    )))
}

/// Fetch a post's comments as a nested reply tree. Admins see every status;
/// everyone else only sees approved comments.
pub async fn get_comments_by_post(
    pool: web::Data<PgPool>,
    user: MaybeUser,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    post_repo::find_with_author(&pool, *post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let service = CommentService::new((**pool).clone());
    let (comments, total) = service
        .get_post_comment_tree(*post_id, user.is_admin())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Comments fetched successfully",
        serde_json::json!({ "comments": comments, "total": total }),
    )))
}

/// Update a comment (owner or admin). Non-admin edits return the comment to
/// the moderation queue.
pub async fn update_comment(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    comment_id: web::Path<Uuid>,
    req: web::Json<UpdateCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let comment = comment_repo::find_by_id(&pool, *comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    middleware::require_owner_or_admin(
        &user,
        comment.user_id,
        "Access denied: You can only update your own comments",
    )?;

    let is_admin = user.role == Role::Admin;
    let service = CommentService::new((**pool).clone());
    let updated = service
        .update_comment(&comment, req.body.trim(), is_admin)
        .await?;

    let message = if is_admin {
        "Comment updated successfully"
    } else {
        "Comment updated and is pending approval"
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        message,
        serde_json::json!({ "comment": updated }),
    )))
}

/// Delete a comment (owner or admin). Comments with replies are redacted in
/// place; leaf comments are removed.
pub async fn delete_comment(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    comment_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comment = comment_repo::find_by_id(&pool, *comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    middleware::require_owner_or_admin(
        &user,
        comment.user_id,
        "Access denied: You can only delete your own comments",
    )?;

    let service = CommentService::new((**pool).clone());
    service.delete_comment(comment.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Comment deleted successfully")))
}
