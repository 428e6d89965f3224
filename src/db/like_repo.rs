use sqlx::PgPool;
use uuid::Uuid;

/// Like a feed. Idempotent: a second like from the same user is a no-op.
/// Returns true when a new row was created.
pub async fn like_feed(pool: &PgPool, user_id: Uuid, feed_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO feed_likes (user_id, feed_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, feed_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(feed_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove a user's like from a feed. Idempotent.
pub async fn unlike_feed(pool: &PgPool, user_id: Uuid, feed_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM feed_likes WHERE user_id = $1 AND feed_id = $2")
        .bind(user_id)
        .bind(feed_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Unique-liker count for a feed
pub async fn feed_like_count(pool: &PgPool, feed_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM feed_likes WHERE feed_id = $1")
        .bind(feed_id)
        .fetch_one(pool)
        .await
}

/// Like a comment. Idempotent, same contract as `like_feed`.
pub async fn like_comment(
    pool: &PgPool,
    user_id: Uuid,
    comment_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO comment_likes (user_id, comment_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, comment_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(comment_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove a user's like from a comment. Idempotent.
pub async fn unlike_comment(
    pool: &PgPool,
    user_id: Uuid,
    comment_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM comment_likes WHERE user_id = $1 AND comment_id = $2")
        .bind(user_id)
        .bind(comment_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Unique-liker count for a comment
pub async fn comment_like_count(pool: &PgPool, comment_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM comment_likes WHERE comment_id = $1")
        .bind(comment_id)
        .fetch_one(pool)
        .await
}
