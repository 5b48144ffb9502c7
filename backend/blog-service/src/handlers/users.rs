/// User profile handlers
use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::middleware::{self, CurrentUser};
use crate::response::ApiResponse;
use crate::validators;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(
        length(min = 1, max = 100, message = "Username must be between 1 and 100 characters"),
        custom(function = "validators::username_validator")
    )]
    pub username: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(custom(function = "validators::person_name_validator"))]
    pub first_name: Option<String>,

    #[validate(custom(function = "validators::person_name_validator"))]
    pub last_name: Option<String>,

    #[validate(length(max = 1000, message = "Bio must not exceed 1000 characters"))]
    pub bio: Option<String>,

    #[validate(
        url(message = "Invalid URL format"),
        length(max = 500, message = "Profile picture URL must not exceed 500 characters")
    )]
    pub profile_picture_url: Option<String>,
}

/// Fetch a user's public profile
pub async fn get_profile(pool: web::Data<PgPool>, user_id: web::Path<Uuid>) -> Result<HttpResponse> {
    let profile = user_repo::find_profile(&pool, *user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "User profile fetched successfully",
        serde_json::json!({ "user": profile }),
    )))
}

/// Update a profile (self or admin). Username/email uniqueness is
/// pre-checked so collisions come back as field-level validation errors.
pub async fn update_profile(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    user_id: web::Path<Uuid>,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    middleware::require_owner_or_admin(
        &user,
        Some(*user_id),
        "You can only update your own profile",
    )?;

    req.validate()?;

    if let Some(username) = req.username.as_deref() {
        if user_repo::username_taken(&pool, username, Some(*user_id)).await? {
            return Err(AppError::field_error("username", "Username is already taken"));
        }
    }

    if let Some(email) = req.email.as_deref() {
        if user_repo::email_taken(&pool, email, Some(*user_id)).await? {
            return Err(AppError::field_error("email", "Email is already taken"));
        }
    }

    let profile = user_repo::update_profile(
        &pool,
        *user_id,
        req.username.as_deref().map(str::trim),
        req.email.as_deref().map(str::trim),
        req.first_name.as_deref(),
        req.last_name.as_deref(),
        req.bio.as_deref(),
        req.profile_picture_url.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %profile.id, "profile updated");

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Profile updated successfully",
        serde_json::json!({ "user": profile }),
    )))
}
