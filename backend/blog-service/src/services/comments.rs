/// Comment service - creation, moderation-aware listing, and the reply-tree
/// builder.
use crate::db::comment_repo;
use crate::error::{AppError, Result};
use crate::models::{Comment, CommentNode, CommentStatus, CommentView};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Reshape a flat, chronologically-ordered comment list into a reply tree.
///
/// Arena-style: one pass indexes every comment by id, a second pass attaches
/// each comment to its parent's replies. A comment whose parent is absent
/// from the input (filtered out or deleted) is promoted to a root node rather
/// than dropped. Input order is preserved at every level.
pub fn build_comment_tree(comments: Vec<CommentView>) -> Vec<CommentNode> {
    let index: HashMap<Uuid, usize> = comments
        .iter()
        .enumerate()
        .map(|(i, c)| (c.id, i))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); comments.len()];
    let mut roots: Vec<usize> = Vec::new();

    for (i, comment) in comments.iter().enumerate() {
        let parent_slot = comment
            .parent_comment_id
            .and_then(|parent_id| index.get(&parent_id).copied())
            .filter(|&parent| parent != i);

        match parent_slot {
            Some(parent) => children[parent].push(i),
            None => roots.push(i),
        }
    }

    let mut slots: Vec<Option<CommentNode>> = comments
        .into_iter()
        .map(|view| Some(CommentNode::from(view)))
        .collect();

    roots
        .iter()
        .filter_map(|&root| detach(&mut slots, &children, root))
        .collect()
}

fn detach(
    slots: &mut Vec<Option<CommentNode>>,
    children: &[Vec<usize>],
    index: usize,
) -> Option<CommentNode> {
    let mut node = slots[index].take()?;
    node.replies = children[index]
        .iter()
        .filter_map(|&child| detach(slots, children, child))
        .collect();
    Some(node)
}

pub struct CommentService {
    pool: PgPool,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a comment by ID
    pub async fn get_comment(&self, comment_id: Uuid) -> Result<Option<Comment>> {
        Ok(comment_repo::find_by_id(&self.pool, comment_id).await?)
    }

    /// Visible comments for a post as a reply tree, with the flat total.
    /// Admins see every status; everyone else sees approved comments only.
    pub async fn get_post_comment_tree(
        &self,
        post_id: Uuid,
        include_all_statuses: bool,
    ) -> Result<(Vec<CommentNode>, usize)> {
        let comments =
            comment_repo::list_for_post(&self.pool, post_id, include_all_statuses).await?;
        let total = comments.len();

        Ok((build_comment_tree(comments), total))
    }

    /// Create a comment, enforcing that any declared parent exists and
    /// belongs to the same post. New comments always start as pending.
    pub async fn create_comment(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        body: &str,
        parent_comment_id: Option<Uuid>,
    ) -> Result<Comment> {
        if let Some(parent_id) = parent_comment_id {
            let parent = comment_repo::find_by_id(&self.pool, parent_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Parent comment not found".to_string()))?;

            if parent.post_id != post_id {
                return Err(AppError::BadRequest(
                    "Parent comment does not belong to this post".to_string(),
                ));
            }
        }

        let comment =
            comment_repo::create_comment(&self.pool, post_id, user_id, body, parent_comment_id)
                .await?;

        tracing::info!(comment_id = %comment.id, %post_id, "comment created, pending approval");

        Ok(comment)
    }

    /// Update a comment's body. Non-admin edits send the comment back to the
    /// moderation queue; admin edits keep the current status.
    pub async fn update_comment(
        &self,
        comment: &Comment,
        body: &str,
        editor_is_admin: bool,
    ) -> Result<Comment> {
        let status = if editor_is_admin {
            comment.status
        } else {
            CommentStatus::Pending
        };

        comment_repo::update_comment(&self.pool, comment.id, body, status)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))
    }

    /// Delete a comment. A comment with replies is redacted in place so the
    /// tree keeps its shape; a leaf comment is removed outright.
    pub async fn delete_comment(&self, comment_id: Uuid) -> Result<()> {
        let replies = comment_repo::count_replies(&self.pool, comment_id).await?;

        if replies > 0 {
            comment_repo::soft_redact(&self.pool, comment_id).await?;
            tracing::info!(%comment_id, replies, "comment redacted to preserve reply tree");
        } else {
            comment_repo::hard_delete(&self.pool, comment_id).await?;
            tracing::info!(%comment_id, "comment deleted");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn view(id: u128, parent: Option<u128>, seq: i64) -> CommentView {
        let base = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().expect("valid time");
        CommentView {
            id: Uuid::from_u128(id),
            post_id: Uuid::from_u128(1000),
            user_id: Some(Uuid::from_u128(2000)),
            parent_comment_id: parent.map(Uuid::from_u128),
            body: format!("comment {id}"),
            status: CommentStatus::Approved,
            created_at: base + Duration::seconds(seq),
            updated_at: base + Duration::seconds(seq),
            author_username: Some("alice".to_string()),
        }
    }

    fn count_nodes(nodes: &[CommentNode]) -> usize {
        nodes.iter().map(|n| 1 + count_nodes(&n.replies)).sum()
    }

    #[test]
    fn nests_replies_under_parents() {
        let tree = build_comment_tree(vec![
            view(1, None, 0),
            view(2, Some(1), 1),
            view(3, Some(1), 2),
            view(4, Some(2), 3),
        ]);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].id, Uuid::from_u128(1));
        assert_eq!(tree[0].replies.len(), 2);
        assert_eq!(tree[0].replies[0].id, Uuid::from_u128(2));
        assert_eq!(tree[0].replies[0].replies[0].id, Uuid::from_u128(4));
        assert_eq!(tree[0].replies[1].id, Uuid::from_u128(3));
    }

    #[test]
    fn missing_parent_promotes_to_root() {
        let tree = build_comment_tree(vec![
            view(1, None, 0),
            view(2, Some(1), 1),
            view(3, Some(99), 2),
        ]);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].id, Uuid::from_u128(1));
        assert_eq!(tree[0].replies.len(), 1);
        assert_eq!(tree[0].replies[0].id, Uuid::from_u128(2));
        assert_eq!(tree[1].id, Uuid::from_u128(3));
        assert!(tree[1].replies.is_empty());
    }

    #[test]
    fn every_comment_appears_exactly_once() {
        let input = vec![
            view(1, None, 0),
            view(2, Some(1), 1),
            view(3, Some(7), 2),
            view(4, None, 3),
            view(5, Some(4), 4),
            view(6, Some(2), 5),
        ];
        let total = input.len();

        let tree = build_comment_tree(input);
        assert_eq!(count_nodes(&tree), total);
    }

    #[test]
    fn preserves_chronological_order_within_a_parent() {
        let tree = build_comment_tree(vec![
            view(1, None, 0),
            view(2, Some(1), 1),
            view(3, Some(1), 2),
            view(4, Some(1), 3),
        ]);

        let reply_ids: Vec<Uuid> = tree[0].replies.iter().map(|r| r.id).collect();
        assert_eq!(
            reply_ids,
            vec![Uuid::from_u128(2), Uuid::from_u128(3), Uuid::from_u128(4)]
        );
    }

    #[test]
    fn empty_input_yields_empty_tree() {
        assert!(build_comment_tree(Vec::new()).is_empty());
    }

    #[test]
    fn self_referencing_parent_becomes_root() {
        // Cannot happen through the write path, but the builder must not loop.
        let tree = build_comment_tree(vec![view(1, Some(1), 0)]);
        assert_eq!(tree.len(), 1);
        assert!(tree[0].replies.is_empty());
    }
}
