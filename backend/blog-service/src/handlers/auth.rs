/// Auth handlers - signup, login, logout
use crate::config::Config;
use crate::error::Result;
use crate::models::Role;
use crate::response::ApiResponse;
use crate::services::AuthService;
use crate::validators;
use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(
        length(min = 1, max = 100, message = "Username must be between 1 and 100 characters"),
        custom(function = "validators::username_validator")
    )]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "validators::password_validator"))]
    pub password: String,

    pub role: Option<Role>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username or email is required"))]
    pub identifier: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Register a new account
pub async fn signup(
    pool: web::Data<PgPool>,
    req: web::Json<SignupRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = AuthService::new((**pool).clone());
    let user = service
        .signup(
            req.username.trim(),
            req.email.trim(),
            &req.password,
            req.role,
        )
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(
        "User registered successfully",
        serde_json::json!({ "user": user }),
    )))
}

/// Log in with a username or email, issuing the session cookie
pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = AuthService::new((**pool).clone());
    let user = service
        .verify_credentials(req.identifier.trim(), &req.password)
        .await?;

    let session = service
        .open_session(user.id, config.session.ttl_hours)
        .await?;

    let cookie = Cookie::build(config.session.cookie_name.clone(), session.id.to_string())
        .path("/")
        .http_only(true)
        .secure(config.session.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::hours(config.session.ttl_hours))
        .finish();

    let public = crate::models::UserPublic::from(&user);

    Ok(HttpResponse::Ok().cookie(cookie).json(ApiResponse::success(
        "Logged in successfully",
        serde_json::json!({ "user": public }),
    )))
}

/// Log out, deleting the session row and clearing the cookie.
/// Succeeds whether or not a session was present.
pub async fn logout(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Some(session_id) = req
        .cookie(&config.session.cookie_name)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
    {
        let service = AuthService::new((**pool).clone());
        service.close_session(session_id).await?;
    }

    let mut removal = Cookie::build(config.session.cookie_name.clone(), "")
        .path("/")
        .finish();
    removal.make_removal();

    Ok(HttpResponse::Ok()
        .cookie(removal)
        .json(ApiResponse::message("Logged out successfully")))
}
