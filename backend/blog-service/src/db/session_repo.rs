/// Session database operations
///
/// Sessions are server-persisted records keyed by the cookie value; they are
/// read fresh from the database on every authenticated request.
use crate::models::{Role, Session};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

/// The user identity carried by an unexpired session.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionUser {
    pub user_id: Uuid,
    pub role: Role,
}

/// Create a new session
pub async fn create_session(
    pool: &PgPool,
    user_id: Uuid,
    ttl_hours: i64,
) -> Result<Session, sqlx::Error> {
    let session_id = Uuid::new_v4();
    let now = Utc::now();
    let expires_at = now + chrono::Duration::hours(ttl_hours);

    sqlx::query_as::<_, Session>(
        r#"
        INSERT INTO sessions (id, user_id, created_at, expires_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, created_at, expires_at
        "#,
    )
    .bind(session_id)
    .bind(user_id)
    .bind(now)
    .bind(expires_at)
    .fetch_one(pool)
    .await
}

/// Resolve an unexpired session to its user's identity and role
pub async fn find_session_user(
    pool: &PgPool,
    session_id: Uuid,
) -> Result<Option<SessionUser>, sqlx::Error> {
    sqlx::query_as::<_, SessionUser>(
        r#"
        SELECT u.id AS user_id, u.role
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.id = $1 AND s.expires_at > NOW()
        "#,
    )
    .bind(session_id)
    .fetch_optional(pool)
    .await
}

/// Delete a session (logout)
pub async fn delete_session(pool: &PgPool, session_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
        .bind(session_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove expired sessions; returns the number of rows deleted
pub async fn delete_expired_sessions(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
