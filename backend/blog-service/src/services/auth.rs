/// Auth service - signup, credential verification, and session lifecycle.
use crate::db::{session_repo, user_repo};
use crate::error::{AppError, Result};
use crate::models::{Role, Session, User, UserPublic};
use crate::security;
use sqlx::PgPool;
use uuid::Uuid;

pub struct AuthService {
    pool: PgPool,
}

impl AuthService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a new account. Usernames and emails must be free; the role
    /// defaults to subscriber and `admin` cannot be self-assigned.
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
        requested_role: Option<Role>,
    ) -> Result<UserPublic> {
        if user_repo::username_taken(&self.pool, username, None).await? {
            return Err(AppError::Conflict(
                "Username has already been taken".to_string(),
            ));
        }

        if user_repo::email_taken(&self.pool, email, None).await? {
            return Err(AppError::Conflict(
                "Email has already been taken".to_string(),
            ));
        }

        let role = match requested_role {
            Some(Role::Author) => Role::Author,
            _ => Role::Subscriber,
        };

        let password_hash = security::hash_password(password)?;
        let user =
            user_repo::create_user(&self.pool, username, email, &password_hash, role).await?;

        tracing::info!(user_id = %user.id, role = role_label(role), "user registered");

        Ok(UserPublic::from(&user))
    }

    /// Verify credentials for a username-or-email identifier.
    pub async fn verify_credentials(&self, identifier: &str, password: &str) -> Result<User> {
        let user = user_repo::find_by_identifier(&self.pool, identifier)
            .await?
            .ok_or_else(|| {
                AppError::Unauthorized("Invalid credentials: user not found".to_string())
            })?;

        if !security::verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized(
                "Invalid credentials: password is incorrect".to_string(),
            ));
        }

        Ok(user)
    }

    /// Open a session for a user
    pub async fn open_session(&self, user_id: Uuid, ttl_hours: i64) -> Result<Session> {
        let session = session_repo::create_session(&self.pool, user_id, ttl_hours).await?;
        tracing::info!(%user_id, session_id = %session.id, "session opened");
        Ok(session)
    }

    /// Close a session; closing an unknown session is not an error
    pub async fn close_session(&self, session_id: Uuid) -> Result<()> {
        if session_repo::delete_session(&self.pool, session_id).await? {
            tracing::info!(%session_id, "session closed");
        }
        Ok(())
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::Admin => "admin",
        Role::Author => "author",
        Role::Subscriber => "subscriber",
    }
}
