use crate::models::{Comment, Recomment};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Comment row with the commenter preview and like count.
///
/// Only the author id and coach flag leave this layer; the thread view hides
/// commenter identities behind per-response labels.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CommentRow {
    pub id: Uuid,
    pub feed_id: Uuid,
    pub user_id: Uuid,
    pub user_is_coach: bool,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub like_count: i64,
}

/// Recomment row with the replier preview
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RecommentRow {
    pub id: Uuid,
    pub comment_id: Uuid,
    pub user_id: Uuid,
    pub user_is_coach: bool,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Create a new comment on a feed
pub async fn create_comment(
    pool: &PgPool,
    feed_id: Uuid,
    user_id: Uuid,
    description: &str,
) -> Result<Comment, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (feed_id, user_id, description)
        VALUES ($1, $2, $3)
        RETURNING id, feed_id, user_id, description, created_at, updated_at
        "#,
    )
    .bind(feed_id)
    .bind(user_id)
    .bind(description)
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

/// Get a single comment by ID
pub async fn find_comment_by_id(
    pool: &PgPool,
    comment_id: Uuid,
) -> Result<Option<Comment>, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, feed_id, user_id, description, created_at, updated_at
        FROM comments
        WHERE id = $1
        "#,
    )
    .bind(comment_id)
    .fetch_optional(pool)
    .await?;

    Ok(comment)
}

/// Update comment text
pub async fn update_comment(
    pool: &PgPool,
    comment_id: Uuid,
    description: &str,
) -> Result<Comment, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        UPDATE comments
        SET description = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING id, feed_id, user_id, description, created_at, updated_at
        "#,
    )
    .bind(comment_id)
    .bind(description)
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

/// Delete a comment; recomments and likes cascade
pub async fn delete_comment(pool: &PgPool, comment_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// All comments on a feed in thread order (oldest first)
pub async fn list_feed_comments(
    pool: &PgPool,
    feed_id: Uuid,
) -> Result<Vec<CommentRow>, sqlx::Error> {
    sqlx::query_as::<_, CommentRow>(
        r#"
        SELECT c.id, c.feed_id, c.user_id, u.is_coach AS user_is_coach,
               c.description, c.created_at,
               (SELECT COUNT(*) FROM comment_likes cl WHERE cl.comment_id = c.id) AS like_count
        FROM comments c
        JOIN users u ON u.id = c.user_id
        WHERE c.feed_id = $1
        ORDER BY c.created_at
        "#,
    )
    .bind(feed_id)
    .fetch_all(pool)
    .await
}

/// All recomments under a feed's comments, oldest first
pub async fn list_feed_recomments(
    pool: &PgPool,
    feed_id: Uuid,
) -> Result<Vec<RecommentRow>, sqlx::Error> {
    sqlx::query_as::<_, RecommentRow>(
        r#"
        SELECT r.id, r.comment_id, r.user_id, u.is_coach AS user_is_coach,
               r.description, r.created_at
        FROM recomments r
        JOIN users u ON u.id = r.user_id
        JOIN comments c ON c.id = r.comment_id
        WHERE c.feed_id = $1
        ORDER BY r.created_at
        "#,
    )
    .bind(feed_id)
    .fetch_all(pool)
    .await
}

/// Create a reply under a comment
pub async fn create_recomment(
    pool: &PgPool,
    comment_id: Uuid,
    user_id: Uuid,
    description: &str,
) -> Result<Recomment, sqlx::Error> {
    let recomment = sqlx::query_as::<_, Recomment>(
        r#"
        INSERT INTO recomments (comment_id, user_id, description)
        VALUES ($1, $2, $3)
        RETURNING id, comment_id, user_id, description, created_at
        "#,
    )
    .bind(comment_id)
    .bind(user_id)
    .bind(description)
    .fetch_one(pool)
    .await?;

    Ok(recomment)
}

/// The feed's most-liked comment, if it has any comments at all
pub async fn top_liked_comment(
    pool: &PgPool,
    feed_id: Uuid,
) -> Result<Option<CommentRow>, sqlx::Error> {
    sqlx::query_as::<_, CommentRow>(
        r#"
        SELECT c.id, c.feed_id, c.user_id, u.is_coach AS user_is_coach,
               c.description, c.created_at,
               (SELECT COUNT(*) FROM comment_likes cl WHERE cl.comment_id = c.id) AS like_count
        FROM comments c
        JOIN users u ON u.id = c.user_id
        WHERE c.feed_id = $1
        ORDER BY like_count DESC, c.created_at
        LIMIT 1
        "#,
    )
    .bind(feed_id)
    .fetch_optional(pool)
    .await
}
