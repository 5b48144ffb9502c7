/// User repository - database operations for accounts and profiles
use crate::models::{Role, User, UserProfile};
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, role, created_at, updated_at";

const PROFILE_COLUMNS: &str = "id, username, email, role, first_name, last_name, bio, \
     profile_picture_url, created_at, updated_at";

/// Create a new user
pub async fn create_user(
    pool: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<User, sqlx::Error> {
    let id = Uuid::new_v4();

    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (id, username, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(username)
    .bind(email.to_lowercase())
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await
}

/// Find a user by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Find a user by username or email (login identifier)
pub async fn find_by_identifier(
    pool: &PgPool,
    identifier: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = $1 OR email = $2"
    ))
    .bind(identifier)
    .bind(identifier.to_lowercase())
    .fetch_optional(pool)
    .await
}

/// Check whether a username is taken, optionally excluding a user id
pub async fn username_taken(
    pool: &PgPool,
    username: &str,
    exclude_id: Option<Uuid>,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 AND ($2::uuid IS NULL OR id <> $2))",
    )
    .bind(username)
    .bind(exclude_id)
    .fetch_one(pool)
    .await
}

/// Check whether an email is taken, optionally excluding a user id
pub async fn email_taken(
    pool: &PgPool,
    email: &str,
    exclude_id: Option<Uuid>,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2))",
    )
    .bind(email.to_lowercase())
    .bind(exclude_id)
    .fetch_one(pool)
    .await
}

/// Fetch a user's public profile (credentials excluded)
pub async fn find_profile(pool: &PgPool, id: Uuid) -> Result<Option<UserProfile>, sqlx::Error> {
    sqlx::query_as::<_, UserProfile>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Partially update a user's profile. Absent fields keep their value.
#[allow(clippy::too_many_arguments)]
pub async fn update_profile(
    pool: &PgPool,
    id: Uuid,
    username: Option<&str>,
    email: Option<&str>,
    first_name: Option<&str>,
    last_name: Option<&str>,
    bio: Option<&str>,
    profile_picture_url: Option<&str>,
) -> Result<Option<UserProfile>, sqlx::Error> {
    sqlx::query_as::<_, UserProfile>(&format!(
        r#"
        UPDATE users
        SET username = COALESCE($2, username),
            email = COALESCE($3, email),
            first_name = COALESCE($4, first_name),
            last_name = COALESCE($5, last_name),
            bio = COALESCE($6, bio),
            profile_picture_url = COALESCE($7, profile_picture_url),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {PROFILE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(username)
    .bind(email.map(|e| e.to_lowercase()))
    .bind(first_name)
    .bind(last_name)
    .bind(bio)
    .bind(profile_picture_url)
    .fetch_optional(pool)
    .await
}
