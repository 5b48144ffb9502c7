/// Category repository
use crate::models::Category;
use sqlx::PgPool;
use uuid::Uuid;

/// Create a new category
pub async fn create_category(
    pool: &PgPool,
    name: &str,
    description: Option<&str>,
    slug: &str,
) -> Result<Category, sqlx::Error> {
    let id = Uuid::new_v4();

    sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO categories (id, name, description, slug)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, description, slug
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(slug)
    .fetch_one(pool)
    .await
}

/// Find a category by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>("SELECT id, name, description, slug FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Find a category by slug
pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        "SELECT id, name, description, slug FROM categories WHERE slug = $1",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await
}

/// List categories ordered by name
pub async fn list_categories(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        "SELECT id, name, description, slug FROM categories ORDER BY name ASC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Count all categories
pub async fn count_categories(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories")
        .fetch_one(pool)
        .await
}

/// Partially update a category. Absent fields keep their value.
pub async fn update_category(
    pool: &PgPool,
    id: Uuid,
    name: Option<&str>,
    description: Option<&str>,
    slug: Option<&str>,
) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        r#"
        UPDATE categories
        SET name = COALESCE($2, name),
            description = COALESCE($3, description),
            slug = COALESCE($4, slug)
        WHERE id = $1
        RETURNING id, name, description, slug
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(slug)
    .fetch_optional(pool)
    .await
}

/// Delete a category
pub async fn delete_category(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
