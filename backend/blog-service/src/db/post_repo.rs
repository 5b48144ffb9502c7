/// Post repository - read queries and row mapping for posts
use crate::models::{Category, PostStatus, PostWithAuthor, Tag};
use sqlx::{PgPool, Row};
use uuid::Uuid;

const POST_AUTHOR_COLUMNS: &str = "p.id, p.user_id, p.title, p.slug, p.body, p.status, \
     p.created_at, p.updated_at, u.username AS author_username";

/// Typed filter for post listings. Fields left as `None` do not constrain
/// the result set.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub status: Option<PostStatus>,
    pub category_slug: Option<String>,
    pub tag_slug: Option<String>,
    pub search: Option<String>,
}

const FILTER_CLAUSE: &str = r#"
    ($1::post_status IS NULL OR p.status = $1)
    AND ($2::text IS NULL OR p.title ILIKE '%' || $2 || '%' OR p.body ILIKE '%' || $2 || '%')
    AND ($3::text IS NULL OR EXISTS (
        SELECT 1 FROM post_categories pc
        JOIN categories c ON c.id = pc.category_id
        WHERE pc.post_id = p.id AND c.slug = $3))
    AND ($4::text IS NULL OR EXISTS (
        SELECT 1 FROM post_tags pt
        JOIN tags t ON t.id = pt.tag_id
        WHERE pt.post_id = p.id AND t.slug = $4))
"#;

/// List posts matching the filter, newest first
pub async fn list_posts(
    pool: &PgPool,
    filter: &PostFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostWithAuthor>, sqlx::Error> {
    sqlx::query_as::<_, PostWithAuthor>(&format!(
        r#"
        SELECT {POST_AUTHOR_COLUMNS}
        FROM posts p
        JOIN users u ON u.id = p.user_id
        WHERE {FILTER_CLAUSE}
        ORDER BY p.created_at DESC
        LIMIT $5 OFFSET $6
        "#
    ))
    .bind(filter.status)
    .bind(filter.search.as_deref())
    .bind(filter.category_slug.as_deref())
    .bind(filter.tag_slug.as_deref())
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Count posts matching the filter
pub async fn count_posts(pool: &PgPool, filter: &PostFilter) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(&format!(
        "SELECT COUNT(*) FROM posts p WHERE {FILTER_CLAUSE}"
    ))
    .bind(filter.status)
    .bind(filter.search.as_deref())
    .bind(filter.category_slug.as_deref())
    .bind(filter.tag_slug.as_deref())
    .fetch_one(pool)
    .await
}

/// Find a post with its author by ID
pub async fn find_with_author(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Option<PostWithAuthor>, sqlx::Error> {
    sqlx::query_as::<_, PostWithAuthor>(&format!(
        r#"
        SELECT {POST_AUTHOR_COLUMNS}
        FROM posts p
        JOIN users u ON u.id = p.user_id
        WHERE p.id = $1
        "#
    ))
    .bind(post_id)
    .fetch_optional(pool)
    .await
}

/// Delete a post; join rows cascade
pub async fn delete_post(pool: &PgPool, post_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Categories for a batch of posts, keyed by post id
pub async fn categories_for_posts(
    pool: &PgPool,
    post_ids: &[Uuid],
) -> Result<Vec<(Uuid, Category)>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT pc.post_id, c.id, c.name, c.description, c.slug
        FROM post_categories pc
        JOIN categories c ON c.id = pc.category_id
        WHERE pc.post_id = ANY($1)
        ORDER BY c.name ASC
        "#,
    )
    .bind(post_ids)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            Ok((
                row.try_get("post_id")?,
                Category {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    description: row.try_get("description")?,
                    slug: row.try_get("slug")?,
                },
            ))
        })
        .collect()
}

/// Tags for a batch of posts, keyed by post id
pub async fn tags_for_posts(
    pool: &PgPool,
    post_ids: &[Uuid],
) -> Result<Vec<(Uuid, Tag)>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT pt.post_id, t.id, t.name, t.slug
        FROM post_tags pt
        JOIN tags t ON t.id = pt.tag_id
        WHERE pt.post_id = ANY($1)
        ORDER BY t.name ASC
        "#,
    )
    .bind(post_ids)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            Ok((
                row.try_get("post_id")?,
                Tag {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    slug: row.try_get("slug")?,
                },
            ))
        })
        .collect()
}

/// Count posts associated with a category
pub async fn count_posts_for_category(
    pool: &PgPool,
    category_id: Uuid,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM post_categories WHERE category_id = $1")
        .bind(category_id)
        .fetch_one(pool)
        .await
}

/// Count posts associated with a tag
pub async fn count_posts_for_tag(pool: &PgPool, tag_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM post_tags WHERE tag_id = $1")
        .bind(tag_id)
        .fetch_one(pool)
        .await
}
