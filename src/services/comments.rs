/// Comment service - thread retrieval, comment/recomment creation and
/// owner-only mutation
use crate::db::{comment_repo, feed_repo, like_repo};
use crate::db::comment_repo::{CommentRow, RecommentRow};
use crate::error::{AppError, Result};
use crate::middleware::permissions::{check_group_access, check_mutate};
use crate::models::{Comment, Recomment, User};
use crate::services::anonymizer;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Commenter preview. Deliberately minimal: the thread view hides
/// identities, so only the id (for client-side grouping) and the coach badge
/// are exposed.
#[derive(Debug, Clone, Serialize)]
pub struct CommentUser {
    pub id: Uuid,
    pub is_coach: bool,
}

/// One reply in a rendered thread
#[derive(Debug, Clone, Serialize)]
pub struct RecommentEntry {
    pub id: Uuid,
    pub user: CommentUser,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub feed_writer: bool,
    pub anonymous_label: String,
}

/// One comment in a rendered thread, replies attached in order
#[derive(Debug, Clone, Serialize)]
pub struct CommentEntry {
    pub id: Uuid,
    pub user: CommentUser,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub like_count: i64,
    pub feed_writer: bool,
    pub anonymous_label: String,
    pub recomments: Vec<RecommentEntry>,
}

/// Like state returned by the comment like/unlike endpoints
#[derive(Debug, Clone, Serialize)]
pub struct CommentLikeStatus {
    pub liked: bool,
    pub like_count: i64,
}

pub struct CommentService {
    pool: PgPool,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The feed's full comment thread with per-response anonymized labels
    pub async fn feed_thread(&self, actor: &User, feed_id: Uuid) -> Result<Vec<CommentEntry>> {
        let feed = feed_repo::find_feed_by_id(&self.pool, feed_id)
            .await?
            .ok_or_else(|| AppError::NotFound("feed not found".to_string()))?;
        check_group_access(Some(actor), feed.group_id).into_result()?;

        let comments = comment_repo::list_feed_comments(&self.pool, feed_id).await?;
        let recomments = comment_repo::list_feed_recomments(&self.pool, feed_id).await?;

        let mut thread = assemble_thread(comments, recomments, feed.user_id);
        anonymizer::label_thread(&mut thread);

        Ok(thread)
    }

    /// Create a comment on a feed
    pub async fn create_comment(
        &self,
        actor: &User,
        feed_id: Uuid,
        description: &str,
    ) -> Result<Comment> {
        let feed = feed_repo::find_feed_by_id(&self.pool, feed_id)
            .await?
            .ok_or_else(|| AppError::NotFound("feed not found".to_string()))?;
        check_group_access(Some(actor), feed.group_id).into_result()?;

        let comment =
            comment_repo::create_comment(&self.pool, feed_id, actor.id, description).await?;

        Ok(comment)
    }

    /// Create a reply under one of the feed's comments
    pub async fn create_recomment(
        &self,
        actor: &User,
        feed_id: Uuid,
        comment_id: Uuid,
        description: &str,
    ) -> Result<Recomment> {
        let feed = feed_repo::find_feed_by_id(&self.pool, feed_id)
            .await?
            .ok_or_else(|| AppError::NotFound("feed not found".to_string()))?;
        check_group_access(Some(actor), feed.group_id).into_result()?;

        let comment = comment_repo::find_comment_by_id(&self.pool, comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("comment not found".to_string()))?;
        if comment.feed_id != feed_id {
            return Err(AppError::NotFound(
                "comment does not belong to this feed".to_string(),
            ));
        }

        let recomment =
            comment_repo::create_recomment(&self.pool, comment_id, actor.id, description).await?;

        Ok(recomment)
    }

    /// Edit a comment; only its author may do this
    pub async fn update_comment(
        &self,
        actor: &User,
        feed_id: Uuid,
        comment_id: Uuid,
        description: &str,
    ) -> Result<Comment> {
        let (feed, comment) = self.load_feed_comment(feed_id, comment_id).await?;
        check_mutate(Some(actor), comment.user_id, feed.group_id).into_result()?;

        let updated = comment_repo::update_comment(&self.pool, comment_id, description).await?;

        Ok(updated)
    }

    /// Delete a comment; only its author may do this
    pub async fn delete_comment(&self, actor: &User, feed_id: Uuid, comment_id: Uuid) -> Result<()> {
        let (feed, comment) = self.load_feed_comment(feed_id, comment_id).await?;
        check_mutate(Some(actor), comment.user_id, feed.group_id).into_result()?;

        comment_repo::delete_comment(&self.pool, comment_id).await?;

        Ok(())
    }

    /// Like a comment; a repeat like is a no-op
    pub async fn like_comment(
        &self,
        actor: &User,
        feed_id: Uuid,
        comment_id: Uuid,
    ) -> Result<CommentLikeStatus> {
        let (feed, _comment) = self.load_feed_comment(feed_id, comment_id).await?;
        check_group_access(Some(actor), feed.group_id).into_result()?;

        like_repo::like_comment(&self.pool, actor.id, comment_id).await?;
        let like_count = like_repo::comment_like_count(&self.pool, comment_id).await?;

        Ok(CommentLikeStatus {
            liked: true,
            like_count,
        })
    }

    /// Remove a like from a comment; removing an absent like is a no-op
    pub async fn unlike_comment(
        &self,
        actor: &User,
        feed_id: Uuid,
        comment_id: Uuid,
    ) -> Result<CommentLikeStatus> {
        let (feed, _comment) = self.load_feed_comment(feed_id, comment_id).await?;
        check_group_access(Some(actor), feed.group_id).into_result()?;

        like_repo::unlike_comment(&self.pool, actor.id, comment_id).await?;
        let like_count = like_repo::comment_like_count(&self.pool, comment_id).await?;

        Ok(CommentLikeStatus {
            liked: false,
            like_count,
        })
    }

    async fn load_feed_comment(
        &self,
        feed_id: Uuid,
        comment_id: Uuid,
    ) -> Result<(crate::models::Feed, Comment)> {
        let feed = feed_repo::find_feed_by_id(&self.pool, feed_id)
            .await?
            .ok_or_else(|| AppError::NotFound("feed not found".to_string()))?;
        let comment = comment_repo::find_comment_by_id(&self.pool, comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("comment not found".to_string()))?;
        if comment.feed_id != feed_id {
            return Err(AppError::NotFound(
                "comment does not belong to this feed".to_string(),
            ));
        }
        Ok((feed, comment))
    }
}

/// Attach each reply to its parent comment, both in chronological order.
///
/// Labels start empty; the anonymizer fills them in afterwards.
pub fn assemble_thread(
    comments: Vec<CommentRow>,
    recomments: Vec<RecommentRow>,
    feed_owner: Uuid,
) -> Vec<CommentEntry> {
    let mut thread: Vec<CommentEntry> = comments
        .into_iter()
        .map(|row| CommentEntry {
            id: row.id,
            user: CommentUser {
                id: row.user_id,
                is_coach: row.user_is_coach,
            },
            description: row.description,
            created_at: row.created_at,
            like_count: row.like_count,
            feed_writer: row.user_id == feed_owner,
            anonymous_label: String::new(),
            recomments: Vec::new(),
        })
        .collect();

    for row in recomments {
        if let Some(parent) = thread.iter_mut().find(|c| c.id == row.comment_id) {
            parent.recomments.push(RecommentEntry {
                id: row.id,
                user: CommentUser {
                    id: row.user_id,
                    is_coach: row.user_is_coach,
                },
                description: row.description,
                created_at: row.created_at,
                feed_writer: row.user_id == feed_owner,
                anonymous_label: String::new(),
            });
        }
    }

    thread
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment_row(id: Uuid, user_id: Uuid, feed_id: Uuid) -> CommentRow {
        CommentRow {
            id,
            feed_id,
            user_id,
            user_is_coach: false,
            description: "c".to_string(),
            created_at: Utc::now(),
            like_count: 0,
        }
    }

    fn recomment_row(comment_id: Uuid, user_id: Uuid) -> RecommentRow {
        RecommentRow {
            id: Uuid::new_v4(),
            comment_id,
            user_id,
            user_is_coach: false,
            description: "r".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn replies_land_on_their_parent_comment_in_order() {
        let feed_id = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let (c1, c2) = (Uuid::new_v4(), Uuid::new_v4());
        let commenter = Uuid::new_v4();

        let comments = vec![
            comment_row(c1, commenter, feed_id),
            comment_row(c2, owner, feed_id),
        ];
        let recomments = vec![
            recomment_row(c2, commenter),
            recomment_row(c1, owner),
            recomment_row(c1, commenter),
        ];

        let thread = assemble_thread(comments, recomments, owner);

        assert_eq!(thread.len(), 2);
        assert_eq!(thread[0].recomments.len(), 2);
        assert_eq!(thread[1].recomments.len(), 1);
        assert!(!thread[0].feed_writer);
        assert!(thread[1].feed_writer);
        assert!(thread[0].recomments[0].feed_writer);
        assert!(!thread[0].recomments[1].feed_writer);
    }

    #[test]
    fn orphan_replies_are_dropped() {
        let feed_id = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let c1 = Uuid::new_v4();

        let comments = vec![comment_row(c1, owner, feed_id)];
        let recomments = vec![recomment_row(Uuid::new_v4(), owner)];

        let thread = assemble_thread(comments, recomments, owner);

        assert!(thread[0].recomments.is_empty());
    }
}
