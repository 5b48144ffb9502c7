/// Post service - listing with filters, detail assembly, and transactional
/// create/update with taxonomy assignment.
use crate::db::post_repo::{self, PostFilter};
use crate::error::{on_unique_violation, AppError, Result};
use crate::models::{Category, PostDetail, PostStatus, PostWithAuthor, Tag};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Fields for a new post. The slug has already been allocated.
#[derive(Debug)]
pub struct NewPost<'a> {
    pub user_id: Uuid,
    pub title: &'a str,
    pub slug: &'a str,
    pub body: &'a str,
    pub status: PostStatus,
    pub category_ids: &'a [Uuid],
    pub tag_ids: &'a [Uuid],
}

/// Fields for a full post update. The slug has already been re-allocated.
#[derive(Debug)]
pub struct PostChanges<'a> {
    pub title: &'a str,
    pub slug: &'a str,
    pub body: &'a str,
    pub status: PostStatus,
    pub category_ids: Option<&'a [Uuid]>,
    pub tag_ids: Option<&'a [Uuid]>,
}

pub struct PostService {
    pool: PgPool,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a post with author and taxonomy by ID
    pub async fn get_post_detail(&self, post_id: Uuid) -> Result<Option<PostDetail>> {
        let Some(post) = post_repo::find_with_author(&self.pool, post_id).await? else {
            return Ok(None);
        };

        let details = self.assemble_details(vec![post]).await?;
        Ok(details.into_iter().next())
    }

    /// List posts matching the filter with their total count
    pub async fn list_posts(
        &self,
        filter: &PostFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<PostDetail>, i64)> {
        let rows = post_repo::list_posts(&self.pool, filter, limit, offset).await?;
        let total = post_repo::count_posts(&self.pool, filter).await?;
        let details = self.assemble_details(rows).await?;

        Ok((details, total))
    }

    /// Create a post and its category/tag associations in one transaction.
    /// A slug lost to a concurrent writer surfaces as a conflict.
    pub async fn create_post(&self, new_post: NewPost<'_>) -> Result<PostDetail> {
        let post_id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO posts (id, user_id, title, slug, body, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(post_id)
        .bind(new_post.user_id)
        .bind(new_post.title)
        .bind(new_post.slug)
        .bind(new_post.body)
        .bind(new_post.status)
        .execute(&mut *tx)
        .await
        .map_err(|e| on_unique_violation(e, "A post with this slug already exists"))?;

        set_post_categories(&mut tx, post_id, new_post.category_ids).await?;
        set_post_tags(&mut tx, post_id, new_post.tag_ids).await?;

        tx.commit().await?;

        tracing::info!(%post_id, slug = %new_post.slug, "post created");

        self.get_post_detail(post_id)
            .await?
            .ok_or_else(|| AppError::Internal("Created post could not be reloaded".to_string()))
    }

    /// Apply a full update to a post, replacing taxonomy assignments when
    /// they are provided.
    pub async fn update_post(&self, post_id: Uuid, changes: PostChanges<'_>) -> Result<PostDetail> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE posts
            SET title = $2, slug = $3, body = $4, status = $5, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(post_id)
        .bind(changes.title)
        .bind(changes.slug)
        .bind(changes.body)
        .bind(changes.status)
        .execute(&mut *tx)
        .await
        .map_err(|e| on_unique_violation(e, "A post with this slug already exists"))?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound("Post not found".to_string()));
        }

        if let Some(category_ids) = changes.category_ids {
            sqlx::query("DELETE FROM post_categories WHERE post_id = $1")
                .bind(post_id)
                .execute(&mut *tx)
                .await?;
            set_post_categories(&mut tx, post_id, category_ids).await?;
        }

        if let Some(tag_ids) = changes.tag_ids {
            sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
                .bind(post_id)
                .execute(&mut *tx)
                .await?;
            set_post_tags(&mut tx, post_id, tag_ids).await?;
        }

        tx.commit().await?;

        self.get_post_detail(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
    }

    /// Delete a post; join rows cascade at the database
    pub async fn delete_post(&self, post_id: Uuid) -> Result<bool> {
        let deleted = post_repo::delete_post(&self.pool, post_id).await?;
        if deleted {
            tracing::info!(%post_id, "post deleted");
        }
        Ok(deleted)
    }

    /// Batch-load categories and tags for a page of posts and combine them
    /// into detail payloads, preserving row order.
    async fn assemble_details(&self, rows: Vec<PostWithAuthor>) -> Result<Vec<PostDetail>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<Uuid> = rows.iter().map(|p| p.id).collect();

        let mut categories_by_post: HashMap<Uuid, Vec<Category>> = HashMap::new();
        for (post_id, category) in post_repo::categories_for_posts(&self.pool, &post_ids).await? {
            categories_by_post.entry(post_id).or_default().push(category);
        }

        let mut tags_by_post: HashMap<Uuid, Vec<Tag>> = HashMap::new();
        for (post_id, tag) in post_repo::tags_for_posts(&self.pool, &post_ids).await? {
            tags_by_post.entry(post_id).or_default().push(tag);
        }

        Ok(rows
            .into_iter()
            .map(|post| {
                let categories = categories_by_post.remove(&post.id).unwrap_or_default();
                let tags = tags_by_post.remove(&post.id).unwrap_or_default();
                PostDetail::from_parts(post, categories, tags)
            })
            .collect())
    }
}

async fn set_post_categories(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    post_id: Uuid,
    category_ids: &[Uuid],
) -> Result<()> {
    for category_id in category_ids {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
                .bind(category_id)
                .fetch_one(&mut **tx)
                .await?;

        if !exists {
            return Err(AppError::BadRequest(format!(
                "Category {category_id} does not exist"
            )));
        }

        sqlx::query(
            "INSERT INTO post_categories (post_id, category_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(post_id)
        .bind(category_id)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

async fn set_post_tags(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    post_id: Uuid,
    tag_ids: &[Uuid],
) -> Result<()> {
    for tag_id in tag_ids {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tags WHERE id = $1)")
            .bind(tag_id)
            .fetch_one(&mut **tx)
            .await?;

        if !exists {
            return Err(AppError::BadRequest(format!("Tag {tag_id} does not exist")));
        }

        sqlx::query("INSERT INTO post_tags (post_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(post_id)
            .bind(tag_id)
            .execute(&mut **tx)
            .await?;
    }

    Ok(())
}
