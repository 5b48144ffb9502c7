/// Comment repository - database operations for the per-post reply tree
use crate::models::{Comment, CommentStatus, CommentView};
use sqlx::PgPool;
use uuid::Uuid;

const COMMENT_COLUMNS: &str =
    "id, post_id, user_id, parent_comment_id, body, status, created_at, updated_at";

/// Create a new comment on a post
pub async fn create_comment(
    pool: &PgPool,
    post_id: Uuid,
    user_id: Uuid,
    body: &str,
    parent_comment_id: Option<Uuid>,
) -> Result<Comment, sqlx::Error> {
    let id = Uuid::new_v4();

    sqlx::query_as::<_, Comment>(&format!(
        r#"
        INSERT INTO comments (id, post_id, user_id, parent_comment_id, body, status)
        VALUES ($1, $2, $3, $4, $5, 'pending')
        RETURNING {COMMENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(post_id)
    .bind(user_id)
    .bind(parent_comment_id)
    .bind(body)
    .fetch_one(pool)
    .await
}

/// Get a single comment by ID
pub async fn find_by_id(pool: &PgPool, comment_id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(&format!(
        "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
    ))
    .bind(comment_id)
    .fetch_optional(pool)
    .await
}

/// All comments for a post in chronological order, joined with author
/// usernames. Non-admin callers only see approved comments.
pub async fn list_for_post(
    pool: &PgPool,
    post_id: Uuid,
    include_all_statuses: bool,
) -> Result<Vec<CommentView>, sqlx::Error> {
    sqlx::query_as::<_, CommentView>(
        r#"
        SELECT c.id, c.post_id, c.user_id, c.parent_comment_id, c.body, c.status,
               c.created_at, c.updated_at, u.username AS author_username
        FROM comments c
        LEFT JOIN users u ON u.id = c.user_id
        WHERE c.post_id = $1 AND ($2 OR c.status = 'approved')
        ORDER BY c.created_at ASC
        "#,
    )
    .bind(post_id)
    .bind(include_all_statuses)
    .fetch_all(pool)
    .await
}

/// Count direct replies to a comment
pub async fn count_replies(pool: &PgPool, comment_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE parent_comment_id = $1")
        .bind(comment_id)
        .fetch_one(pool)
        .await
}

/// Update a comment's body and status
pub async fn update_comment(
    pool: &PgPool,
    comment_id: Uuid,
    body: &str,
    status: CommentStatus,
) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(&format!(
        r#"
        UPDATE comments
        SET body = $2, status = $3, updated_at = NOW()
        WHERE id = $1
        RETURNING {COMMENT_COLUMNS}
        "#
    ))
    .bind(comment_id)
    .bind(body)
    .bind(status)
    .fetch_optional(pool)
    .await
}

/// Redact a comment in place, keeping its position in the reply tree
pub async fn soft_redact(pool: &PgPool, comment_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE comments
        SET body = '[Comment deleted]', status = 'spam', updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(comment_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove a comment row entirely
pub async fn hard_delete(pool: &PgPool, comment_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
