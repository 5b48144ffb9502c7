/// Tag repository
use crate::models::Tag;
use sqlx::PgPool;
use uuid::Uuid;

/// Create a new tag
pub async fn create_tag(pool: &PgPool, name: &str, slug: &str) -> Result<Tag, sqlx::Error> {
    let id = Uuid::new_v4();

    sqlx::query_as::<_, Tag>(
        r#"
        INSERT INTO tags (id, name, slug)
        VALUES ($1, $2, $3)
        RETURNING id, name, slug
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(slug)
    .fetch_one(pool)
    .await
}

/// Find a tag by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>("SELECT id, name, slug FROM tags WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Find a tag by slug
pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>("SELECT id, name, slug FROM tags WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await
}

/// Check whether a tag with this name or slug already exists
pub async fn name_or_slug_exists(
    pool: &PgPool,
    name: &str,
    slug: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM tags WHERE name = $1 OR slug = $2)")
        .bind(name)
        .bind(slug)
        .fetch_one(pool)
        .await
}

/// List tags ordered by name
pub async fn list_tags(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>("SELECT id, name, slug FROM tags ORDER BY name ASC LIMIT $1 OFFSET $2")
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// Count all tags
pub async fn count_tags(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tags")
        .fetch_one(pool)
        .await
}

/// Partially update a tag. Absent fields keep their value.
pub async fn update_tag(
    pool: &PgPool,
    id: Uuid,
    name: Option<&str>,
    slug: Option<&str>,
) -> Result<Option<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>(
        r#"
        UPDATE tags
        SET name = COALESCE($2, name),
            slug = COALESCE($3, slug)
        WHERE id = $1
        RETURNING id, name, slug
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(slug)
    .fetch_optional(pool)
    .await
}

/// Delete a tag
pub async fn delete_tag(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tags WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
