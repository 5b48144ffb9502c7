/// Category handlers - listing is public, mutation is admin-only
use crate::db::{category_repo, post_repo};
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

const UNIQUE_MESSAGE: &str = "A category with this name or slug already exists";

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 2, max = 255, message = "Category name must be between 2 and 255 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,

    #[validate(custom(function = "validators::slug_validator"))]
    pub slug: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,

    #[validate(custom(function = "validators::slug_validator"))]
    pub slug: Option<String>,
}

/// List categories with pagination
pub async fn list_categories(
    pool: web::Data<PgPool>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let options = query.options();
    let categories = category_repo::list_categories(&pool, options.limit, options.offset).await?;
    let total = category_repo::count_categories(&pool).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Categories fetched successfully",
        serde_json::json!({
            "categories": categories,
            "pagination": PaginationMeta::new(total, options),
        }),
    )))
}

/// Fetch a category by ID
pub async fn get_category(
    pool: web::Data<PgPool>,
    category_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let category = category_repo::find_by_id(&pool, *category_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Category fetched successfully",
        serde_json::json!({ "category": category }),
    )))
}

/// Fetch a category by slug
pub async fn get_category_by_slug(
    pool: web::Data<PgPool>,
    slug: web::Path<String>,
) -> Result<HttpResponse> {
    let category = category_repo::find_by_slug(&pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Category fetched successfully",
        serde_json::json!({ "category": category }),
    )))
}

/// Create a category (admin only). The slug comes from the provided value or
/// is derived from the name.
pub async fn create_category(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    req: web::Json<CreateCategoryRequest>,
) -> Result<HttpResponse> {
    middleware::require_admin(&user, "category management")?;
    req.validate()?;

    let base = match req.slug.as_deref() {
        Some(slug) if !slug.trim().is_empty() => slug.to_string(),
        _ => slugify(&req.name)?,
    };
    let slug = ensure_unique_slug(&pool, SlugScope::Categories, &base, None).await?;

    let category =
        category_repo::create_category(&pool, req.name.trim(), req.description.as_deref(), &slug)
            .await
            .map_err(|e| on_unique_violation(e, UNIQUE_MESSAGE))?;

    tracing::info!(category_id = %category.id, %slug, "category created");

    Ok(HttpResponse::Created().json(ApiResponse::success(
        "Category created successfully",
        serde_json::json!({ "category": category }),
    )))
}

/// Update a category (admin only). A new slug is re-checked for uniqueness,
/// excluding the category itself.
pub async fn update_category(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    category_id: web::Path<Uuid>,
    req: web::Json<UpdateCategoryRequest>,
) -> Result<HttpResponse> {
    middleware::require_admin(&user, "category management")?;
    req.validate()?;

    category_repo::find_by_id(&pool, *category_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    let slug = match (req.slug.as_deref(), req.name.as_deref()) {
        (Some(slug), _) if !slug.trim().is_empty() => {
            Some(ensure_unique_slug(&pool, SlugScope::Categories, slug, Some(*category_id)).await?)
        }
        (None, Some(name)) => {
            let base = slugify(name)?;
            Some(ensure_unique_slug(&pool, SlugScope::Categories, &base, Some(*category_id)).await?)
        }
        _ => None,
    };

    let category = category_repo::update_category(
        &pool,
        *category_id,
        req.name.as_deref().map(str::trim),
        req.description.as_deref(),
        slug.as_deref(),
    )
    .await
    .map_err(|e| on_unique_violation(e, UNIQUE_MESSAGE))?
    .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Category updated successfully",
        serde_json::json!({ "category": category }),
    )))
}

/// Delete a category (admin only). Refused while posts still reference it.
pub async fn delete_category(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    category_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    middleware::require_admin(&user, "category management")?;

    let category = category_repo::find_by_id(&pool, *category_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    let associated = post_repo::count_posts_for_category(&pool, category.id).await?;
    if associated > 0 {
        return Ok(HttpResponse::Conflict().json(serde_json::json!({
            "status": "fail",
            "message": format!(
                "Cannot delete category. It is associated with {associated} post(s). \
                 Please remove the category from all posts before deletion."
            ),
            "data": { "associatedPosts": associated },
        })));
    }

    category_repo::delete_category(&pool, category.id).await?;
    tracing::info!(category_id = %category.id, "category deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::message("Category deleted successfully")))
}
