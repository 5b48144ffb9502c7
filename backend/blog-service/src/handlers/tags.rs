/// Tag handlers - listing is public, mutation is admin-only
use crate::db::{post_repo, tag_repo};
use crate::error::{on_unique_violation, AppError, Result};
use crate::middleware::{self, CurrentUser};
use crate::pagination::{PageQuery, PaginationMeta};
use crate::response::ApiResponse;
use crate::services::{ensure_unique_slug, slugify, SlugScope};
use crate::validators;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const UNIQUE_MESSAGE: &str = "Tag with this name or slug already exists";

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagRequest {
    #[validate(length(min = 1, max = 50, message = "Tag name must be between 1 and 50 characters"))]
    pub name: String,

    #[validate(custom(function = "validators::slug_validator"))]
    pub slug: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTagRequest {
    #[validate(length(min = 1, max = 50, message = "Tag name must be between 1 and 50 characters"))]
    pub name: Option<String>,

    #[validate(custom(function = "validators::slug_validator"))]
    pub slug: Option<String>,
}

/// List tags with pagination
pub async fn list_tags(
    pool: web::Data<PgPool>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let options = query.options();
    let tags = tag_repo::list_tags(&pool, options.limit, options.offset).await?;
    let total = tag_repo::count_tags(&pool).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Tags fetched successfully",
        serde_json::json!({
            "tags": tags,
            "pagination": PaginationMeta::new(total, options),
        }),
    )))
}

/// Fetch a tag by ID
pub async fn get_tag(pool: web::Data<PgPool>, tag_id: web::Path<Uuid>) -> Result<HttpResponse> {
    let tag = tag_repo::find_by_id(&pool, *tag_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tag not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Tag fetched successfully",
        serde_json::json!({ "tag": tag }),
    )))
}

/// Fetch a tag by slug
pub async fn get_tag_by_slug(
    pool: web::Data<PgPool>,
    slug: web::Path<String>,
) -> Result<HttpResponse> {
    let tag = tag_repo::find_by_slug(&pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Tag not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Tag fetched successfully",
        serde_json::json!({ "tag": tag }),
    )))
}

/// Create a tag (admin only)
pub async fn create_tag(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    req: web::Json<CreateTagRequest>,
) -> Result<HttpResponse> {
    middleware::require_admin(&user, "tag management")?;
    req.validate()?;

    let name = req.name.trim();
    let base = match req.slug.as_deref() {
        Some(slug) if !slug.trim().is_empty() => slug.to_string(),
        _ => slugify(name)?,
    };

    if tag_repo::name_or_slug_exists(&pool, name, &base).await? {
        return Err(AppError::Conflict(UNIQUE_MESSAGE.to_string()));
    }

    let slug = ensure_unique_slug(&pool, SlugScope::Tags, &base, None).await?;

    let tag = tag_repo::create_tag(&pool, name, &slug)
        .await
        .map_err(|e| on_unique_violation(e, UNIQUE_MESSAGE))?;

    tracing::info!(tag_id = %tag.id, %slug, "tag created");

    Ok(HttpResponse::Created().json(ApiResponse::success(
        "Tag created successfully",
        serde_json::json!({ "tag": tag }),
    )))
}

/// Update a tag (admin only)
pub async fn update_tag(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    tag_id: web::Path<Uuid>,
    req: web::Json<UpdateTagRequest>,
) -> Result<HttpResponse> {
    middleware::require_admin(&user, "tag management")?;
    req.validate()?;

    tag_repo::find_by_id(&pool, *tag_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tag not found".to_string()))?;

    let slug = match (req.slug.as_deref(), req.name.as_deref()) {
        (Some(slug), _) if !slug.trim().is_empty() => {
            Some(ensure_unique_slug(&pool, SlugScope::Tags, slug, Some(*tag_id)).await?)
        }
        (None, Some(name)) => {
            let base = slugify(name)?;
            Some(ensure_unique_slug(&pool, SlugScope::Tags, &base, Some(*tag_id)).await?)
        }
        _ => None,
    };

    let tag = tag_repo::update_tag(
        &pool,
        *tag_id,
        req.name.as_deref().map(str::trim),
        slug.as_deref(),
    )
    .await
    .map_err(|e| on_unique_violation(e, UNIQUE_MESSAGE))?
    .ok_or_else(|| AppError::NotFound("Tag not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Tag updated successfully",
        serde_json::json!({ "tag": tag }),
    )))
}

/// Delete a tag (admin only). Refused while posts still reference it.
pub async fn delete_tag(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    tag_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    middleware::require_admin(&user, "tag management")?;

    let tag = tag_repo::find_by_id(&pool, *tag_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tag not found".to_string()))?;

    let associated = post_repo::count_posts_for_tag(&pool, tag.id).await?;
    if associated > 0 {
        return Ok(HttpResponse::Conflict().json(serde_json::json!({
            "status": "fail",
            "message": format!(
                "Cannot delete tag. It is associated with {associated} post(s). \
                 Please remove the tag from all posts before deletion."
            ),
            "data": { "associatedPosts": associated },
        })));
    }

    tag_repo::delete_tag(&pool, tag.id).await?;
    tracing::info!(tag_id = %tag.id, "tag deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::message("Tag deleted successfully")))
}
