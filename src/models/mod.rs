/// Data models for the community service
///
/// Entity structs map 1:1 onto the relational schema in `migrations/`.
/// Derived display values (like counts, comment counts, thumbnails) are
/// computed per query and live on the row/response types in `db` and
/// `services`, not here.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reserved category name: list every feed in the group, no category filter.
pub const CATEGORY_ALL_POSTS: &str = "전체글";

/// Reserved category name: list the group's feeds by like count instead of
/// filtering on the category.
pub const CATEGORY_POPULAR: &str = "인기글";

/// Group entity - a community that owns categories and feeds
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Category entity - belongs to exactly one group
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub group_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Reserved categories switch the listing query instead of filtering.
    pub fn is_reserved(&self) -> bool {
        self.name == CATEGORY_ALL_POSTS || self.name == CATEGORY_POPULAR
    }
}

/// User entity - the acting identity on every request
///
/// `group_id` scopes what the user may read and write; staff bypass the
/// scoping entirely. Account management itself lives in the auth service.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub group_id: Option<Uuid>,
    pub is_coach: bool,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

/// Feed entity - a user-authored post scoped to a group/category
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Feed {
    pub id: Uuid,
    pub user_id: Uuid,
    pub group_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub visited: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Image attached to a feed; the oldest one serves as the thumbnail
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FeedImage {
    pub id: Uuid,
    pub feed_id: Uuid,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// Comment entity - first-level discussion entry on a feed
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub feed_id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Recomment entity - reply attached to a comment
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Recomment {
    pub id: Uuid,
    pub comment_id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// FeedLike entity - at most one row per (user, feed)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FeedLike {
    pub id: Uuid,
    pub user_id: Uuid,
    pub feed_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// CommentLike entity - at most one row per (user, comment)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentLike {
    pub id: Uuid,
    pub user_id: Uuid,
    pub comment_id: Uuid,
    pub created_at: DateTime<Utc>,
}
