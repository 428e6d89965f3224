use crate::models::{Feed, FeedImage};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Flat listing row: feed columns joined with the author preview and the
/// per-feed aggregates (like count, comment count, thumbnail).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FeedSummaryRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub visited: i32,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub username: String,
    pub user_name: String,
    pub user_avatar: Option<String>,
    pub user_is_coach: bool,
    pub group_id: Option<Uuid>,
    pub group_name: Option<String>,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub like_count: i64,
    pub comments_count: i64,
    pub thumbnail: Option<String>,
}

/// Detail row: the summary columns plus the fields only the detail view shows.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FeedDetailRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub visited: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub username: String,
    pub user_name: String,
    pub user_avatar: Option<String>,
    pub user_is_coach: bool,
    pub group_id: Option<Uuid>,
    pub group_name: Option<String>,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub like_count: i64,
    pub comments_count: i64,
    pub thumbnail: Option<String>,
    pub is_like: bool,
}

/// Search-result row (title search lists a reduced shape)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TinyFeedRow {
    pub id: Uuid,
    pub title: String,
    pub thumbnail: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Suggestion row for incremental search
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FeedSuggestionRow {
    pub id: Uuid,
    pub title: String,
}

const SUMMARY_SELECT: &str = r#"
    SELECT f.id, f.title, f.description, f.visited, f.created_at,
           u.id AS user_id, u.username, u.name AS user_name,
           u.avatar AS user_avatar, u.is_coach AS user_is_coach,
           g.id AS group_id, g.name AS group_name,
           c.id AS category_id, c.name AS category_name,
           (SELECT COUNT(*) FROM feed_likes fl WHERE fl.feed_id = f.id) AS like_count,
           (SELECT COUNT(*) FROM comments cm WHERE cm.feed_id = f.id) AS comments_count,
           (SELECT fi.url FROM feed_images fi
             WHERE fi.feed_id = f.id
             ORDER BY fi.created_at
             LIMIT 1) AS thumbnail
    FROM feeds f
    JOIN users u ON u.id = f.user_id
    LEFT JOIN groups g ON g.id = f.group_id
    LEFT JOIN categories c ON c.id = f.category_id
"#;

/// Escape LIKE wildcards in a user-supplied keyword so it matches literally.
pub fn escape_like(keyword: &str) -> String {
    keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn like_pattern(keyword: &str) -> String {
    format!("%{}%", escape_like(keyword))
}

/// Create a new feed in the author's group
pub async fn create_feed(
    pool: &PgPool,
    user_id: Uuid,
    group_id: Option<Uuid>,
    category_id: Uuid,
    title: &str,
    description: &str,
) -> Result<Feed, sqlx::Error> {
    let feed = sqlx::query_as::<_, Feed>(
        r#"
        INSERT INTO feeds (user_id, group_id, category_id, title, description)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, user_id, group_id, category_id, title, description,
                  visited, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(group_id)
    .bind(category_id)
    .bind(title)
    .bind(description)
    .fetch_one(pool)
    .await?;

    Ok(feed)
}

/// Find a feed by ID
pub async fn find_feed_by_id(pool: &PgPool, feed_id: Uuid) -> Result<Option<Feed>, sqlx::Error> {
    let feed = sqlx::query_as::<_, Feed>(
        r#"
        SELECT id, user_id, group_id, category_id, title, description,
               visited, created_at, updated_at
        FROM feeds
        WHERE id = $1
        "#,
    )
    .bind(feed_id)
    .fetch_optional(pool)
    .await?;

    Ok(feed)
}

/// Partially update a feed; absent fields keep their current value
pub async fn update_feed(
    pool: &PgPool,
    feed_id: Uuid,
    title: Option<&str>,
    description: Option<&str>,
    category_id: Option<Uuid>,
) -> Result<Feed, sqlx::Error> {
    let feed = sqlx::query_as::<_, Feed>(
        r#"
        UPDATE feeds
        SET title = COALESCE($2, title),
            description = COALESCE($3, description),
            category_id = COALESCE($4, category_id),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, user_id, group_id, category_id, title, description,
                  visited, created_at, updated_at
        "#,
    )
    .bind(feed_id)
    .bind(title)
    .bind(description)
    .bind(category_id)
    .fetch_one(pool)
    .await?;

    Ok(feed)
}

/// Delete a feed; comments, recomments, images and likes cascade
pub async fn delete_feed(pool: &PgPool, feed_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM feeds WHERE id = $1")
        .bind(feed_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Increment the visit counter.
///
/// A single UPDATE so concurrent detail fetches never lose a count; the
/// read-modify-write happens inside the database.
pub async fn increment_visited(pool: &PgPool, feed_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE feeds SET visited = visited + 1 WHERE id = $1")
        .bind(feed_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Detail view row with the viewer-dependent `is_like` flag
pub async fn find_feed_detail(
    pool: &PgPool,
    feed_id: Uuid,
    viewer_id: Option<Uuid>,
) -> Result<Option<FeedDetailRow>, sqlx::Error> {
    let row = sqlx::query_as::<_, FeedDetailRow>(
        r#"
        SELECT f.id, f.title, f.description, f.visited, f.created_at, f.updated_at,
               u.id AS user_id, u.username, u.name AS user_name,
               u.avatar AS user_avatar, u.is_coach AS user_is_coach,
               g.id AS group_id, g.name AS group_name,
               c.id AS category_id, c.name AS category_name,
               (SELECT COUNT(*) FROM feed_likes fl WHERE fl.feed_id = f.id) AS like_count,
               (SELECT COUNT(*) FROM comments cm WHERE cm.feed_id = f.id) AS comments_count,
               (SELECT fi.url FROM feed_images fi
                 WHERE fi.feed_id = f.id
                 ORDER BY fi.created_at
                 LIMIT 1) AS thumbnail,
               EXISTS(SELECT 1 FROM feed_likes fl
                       WHERE fl.feed_id = f.id AND fl.user_id = $2) AS is_like
        FROM feeds f
        JOIN users u ON u.id = f.user_id
        LEFT JOIN groups g ON g.id = f.group_id
        LEFT JOIN categories c ON c.id = f.category_id
        WHERE f.id = $1
        "#,
    )
    .bind(feed_id)
    .bind(viewer_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Count every feed
pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM feeds")
        .fetch_one(pool)
        .await
}

/// Count feeds in a group
pub async fn count_by_group(pool: &PgPool, group_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM feeds WHERE group_id = $1")
        .bind(group_id)
        .fetch_one(pool)
        .await
}

/// Count feeds in a (group, category) pair
pub async fn count_by_group_category(
    pool: &PgPool,
    group_id: Uuid,
    category_id: Uuid,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM feeds WHERE group_id = $1 AND category_id = $2")
        .bind(group_id)
        .bind(category_id)
        .fetch_one(pool)
        .await
}

/// Count keyword matches (title or description) within a group
pub async fn count_search(
    pool: &PgPool,
    group_id: Uuid,
    keyword: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM feeds
        WHERE group_id = $1 AND (title ILIKE $2 OR description ILIKE $2)
        "#,
    )
    .bind(group_id)
    .bind(like_pattern(keyword))
    .fetch_one(pool)
    .await
}

/// All feeds, newest first
pub async fn list_recent(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<FeedSummaryRow>, sqlx::Error> {
    let query = format!(
        "{SUMMARY_SELECT} ORDER BY f.created_at DESC LIMIT $1 OFFSET $2"
    );
    sqlx::query_as::<_, FeedSummaryRow>(&query)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// All feeds by like count, ties newest first
pub async fn list_popular(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<FeedSummaryRow>, sqlx::Error> {
    let query = format!(
        "{SUMMARY_SELECT} ORDER BY like_count DESC, f.created_at DESC LIMIT $1 OFFSET $2"
    );
    sqlx::query_as::<_, FeedSummaryRow>(&query)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// A group's feeds, newest first
pub async fn list_group_recent(
    pool: &PgPool,
    group_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<FeedSummaryRow>, sqlx::Error> {
    let query = format!(
        "{SUMMARY_SELECT} WHERE f.group_id = $1 ORDER BY f.created_at DESC LIMIT $2 OFFSET $3"
    );
    sqlx::query_as::<_, FeedSummaryRow>(&query)
        .bind(group_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// A group's feeds by like count, ties newest first
pub async fn list_group_popular(
    pool: &PgPool,
    group_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<FeedSummaryRow>, sqlx::Error> {
    let query = format!(
        "{SUMMARY_SELECT} WHERE f.group_id = $1 ORDER BY like_count DESC, f.created_at DESC LIMIT $2 OFFSET $3"
    );
    sqlx::query_as::<_, FeedSummaryRow>(&query)
        .bind(group_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// Feeds in a concrete (group, category) pair, newest first
pub async fn list_group_category(
    pool: &PgPool,
    group_id: Uuid,
    category_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<FeedSummaryRow>, sqlx::Error> {
    let query = format!(
        "{SUMMARY_SELECT} WHERE f.group_id = $1 AND f.category_id = $2 ORDER BY f.created_at DESC LIMIT $3 OFFSET $4"
    );
    sqlx::query_as::<_, FeedSummaryRow>(&query)
        .bind(group_id)
        .bind(category_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// Up to `limit` title matches for incremental search, newest first
pub async fn search_titles(
    pool: &PgPool,
    group_id: Uuid,
    keyword: &str,
    limit: i64,
) -> Result<Vec<FeedSuggestionRow>, sqlx::Error> {
    sqlx::query_as::<_, FeedSuggestionRow>(
        r#"
        SELECT id, title FROM feeds
        WHERE group_id = $1 AND title ILIKE $2
        ORDER BY created_at DESC
        LIMIT $3
        "#,
    )
    .bind(group_id)
    .bind(like_pattern(keyword))
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// One page of full search results (title or description match), newest first
pub async fn search_page(
    pool: &PgPool,
    group_id: Uuid,
    keyword: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<TinyFeedRow>, sqlx::Error> {
    sqlx::query_as::<_, TinyFeedRow>(
        r#"
        SELECT f.id, f.title, f.created_at,
               (SELECT fi.url FROM feed_images fi
                 WHERE fi.feed_id = f.id
                 ORDER BY fi.created_at
                 LIMIT 1) AS thumbnail
        FROM feeds f
        WHERE f.group_id = $1 AND (f.title ILIKE $2 OR f.description ILIKE $2)
        ORDER BY f.created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(group_id)
    .bind(like_pattern(keyword))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Attach an image to a feed
pub async fn add_feed_image(
    pool: &PgPool,
    feed_id: Uuid,
    url: &str,
) -> Result<FeedImage, sqlx::Error> {
    sqlx::query_as::<_, FeedImage>(
        r#"
        INSERT INTO feed_images (feed_id, url)
        VALUES ($1, $2)
        RETURNING id, feed_id, url, created_at
        "#,
    )
    .bind(feed_id)
    .bind(url)
    .fetch_one(pool)
    .await
}

/// Remove every image attached to a feed
pub async fn clear_feed_images(pool: &PgPool, feed_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM feed_images WHERE feed_id = $1")
        .bind(feed_id)
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_like_neutralizes_wildcards() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn like_pattern_wraps_the_escaped_keyword() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
