/// Feed service - listings, filtering, search, and feed CRUD
use crate::db::feed_repo::{self, FeedDetailRow, FeedSummaryRow, FeedSuggestionRow, TinyFeedRow};
use crate::db::{comment_repo, group_repo, like_repo};
use crate::error::{AppError, Result};
use crate::middleware::permissions::{check_group_access, check_group_request, check_mutate};
use crate::models::{User, CATEGORY_ALL_POSTS, CATEGORY_POPULAR};
use crate::services::comments::CommentUser;
use crate::services::pagination::{resolve_page, Page, GLOBAL_PAGE_SIZE, SCOPED_PAGE_SIZE};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Number of incremental-search suggestions returned
pub const SUGGESTION_LIMIT: i64 = 5;

#[derive(Debug, Clone, Serialize)]
pub struct UserPreview {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub avatar: Option<String>,
    pub is_coach: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupPreview {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryPreview {
    pub id: Uuid,
    pub name: String,
}

/// Listing item
#[derive(Debug, Clone, Serialize)]
pub struct FeedSummary {
    pub id: Uuid,
    pub user: UserPreview,
    pub group: Option<GroupPreview>,
    pub category: Option<CategoryPreview>,
    pub title: String,
    pub description: String,
    pub visited: i32,
    pub created_at: DateTime<Utc>,
    pub like_count: i64,
    pub comments_count: i64,
    pub thumbnail: Option<String>,
}

/// Preview of the feed's most-liked comment on the detail view
#[derive(Debug, Clone, Serialize)]
pub struct CommentPreview {
    pub id: Uuid,
    pub user: CommentUser,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub like_count: i64,
}

/// Detail view
#[derive(Debug, Clone, Serialize)]
pub struct FeedDetail {
    pub id: Uuid,
    pub user: UserPreview,
    pub group: Option<GroupPreview>,
    pub category: Option<CategoryPreview>,
    pub title: String,
    pub description: String,
    pub visited: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub like_count: i64,
    pub comments_count: i64,
    pub highest_like_comments: Vec<CommentPreview>,
    pub thumbnail: Option<String>,
    pub is_like: bool,
}

/// Like state returned by the feed like/unlike endpoints
#[derive(Debug, Clone, Serialize)]
pub struct FeedLikeStatus {
    pub liked: bool,
    pub like_count: i64,
}

/// Fields accepted when creating a feed
pub struct NewFeed<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub category_id: Uuid,
    pub image: Option<&'a str>,
}

/// Fields accepted on partial update; `image` distinguishes "leave alone"
/// (None) from "clear" (Some(None)) and "replace" (Some(Some(url)))
pub struct FeedChanges<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub category_id: Option<Uuid>,
    pub image: Option<Option<&'a str>>,
}

pub struct FeedService {
    pool: PgPool,
}

impl FeedService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Every feed, newest first, 24 per page
    pub async fn list_recent(&self, page: i64) -> Result<Page<FeedSummary>> {
        let count = feed_repo::count_all(&self.pool).await?;
        let window = resolve_page(count, GLOBAL_PAGE_SIZE, page)?;
        let rows = feed_repo::list_recent(&self.pool, window.limit, window.offset).await?;

        Ok(Page::new(window, rows.into_iter().map(summary_from).collect()))
    }

    /// Every feed by like count, newest first on ties, 24 per page
    pub async fn list_popular(&self, page: i64) -> Result<Page<FeedSummary>> {
        let count = feed_repo::count_all(&self.pool).await?;
        let window = resolve_page(count, GLOBAL_PAGE_SIZE, page)?;
        let rows = feed_repo::list_popular(&self.pool, window.limit, window.offset).await?;

        Ok(Page::new(window, rows.into_iter().map(summary_from).collect()))
    }

    /// Group listing filtered by category, 12 per page.
    ///
    /// The two reserved category names change the query instead of
    /// filtering: "전체글" lists the whole group, "인기글" lists the whole
    /// group by like count.
    pub async fn list_group_category(
        &self,
        actor: &User,
        group_id: Uuid,
        category_id: Uuid,
        page: i64,
    ) -> Result<Page<FeedSummary>> {
        check_group_request(Some(actor), group_id).into_result()?;

        let category = group_repo::find_category_by_id(&self.pool, category_id)
            .await?
            .ok_or_else(|| AppError::NotFound("category not found".to_string()))?;

        let count = if category.is_reserved() {
            feed_repo::count_by_group(&self.pool, group_id).await?
        } else {
            feed_repo::count_by_group_category(&self.pool, group_id, category_id).await?
        };
        let window = resolve_page(count, SCOPED_PAGE_SIZE, page)?;

        let rows = match category.name.as_str() {
            CATEGORY_ALL_POSTS => {
                feed_repo::list_group_recent(&self.pool, group_id, window.limit, window.offset)
                    .await?
            }
            CATEGORY_POPULAR => {
                feed_repo::list_group_popular(&self.pool, group_id, window.limit, window.offset)
                    .await?
            }
            _ => {
                feed_repo::list_group_category(
                    &self.pool,
                    group_id,
                    category_id,
                    window.limit,
                    window.offset,
                )
                .await?
            }
        };

        Ok(Page::new(window, rows.into_iter().map(summary_from).collect()))
    }

    /// Up to five title matches for incremental search, newest first.
    /// An empty keyword returns no suggestions and runs no query.
    pub async fn search_suggestions(
        &self,
        actor: &User,
        group_id: Uuid,
        keyword: &str,
    ) -> Result<Vec<FeedSuggestionRow>> {
        check_group_request(Some(actor), group_id).into_result()?;

        if keyword.is_empty() {
            return Ok(Vec::new());
        }

        let rows =
            feed_repo::search_titles(&self.pool, group_id, keyword, SUGGESTION_LIMIT).await?;

        Ok(rows)
    }

    /// Full search results (title or description match), 12 per page.
    /// An empty keyword returns an empty page and runs no query.
    pub async fn search_results(
        &self,
        actor: &User,
        group_id: Uuid,
        keyword: &str,
        page: i64,
    ) -> Result<Page<TinyFeedRow>> {
        check_group_request(Some(actor), group_id).into_result()?;

        if keyword.is_empty() {
            return Ok(Page::empty());
        }

        let count = feed_repo::count_search(&self.pool, group_id, keyword).await?;
        let window = resolve_page(count, SCOPED_PAGE_SIZE, page)?;
        let rows =
            feed_repo::search_page(&self.pool, group_id, keyword, window.limit, window.offset)
                .await?;

        Ok(Page::new(window, rows))
    }

    /// Create a feed in the actor's group.
    ///
    /// The category must resolve inside the actor's group; a user without a
    /// group has no categories to post under.
    pub async fn create(&self, actor: &User, new_feed: NewFeed<'_>) -> Result<FeedDetail> {
        let category = match actor.group_id {
            Some(group_id) => {
                group_repo::find_category_in_group(&self.pool, group_id, new_feed.category_id)
                    .await?
            }
            None => None,
        }
        .ok_or_else(|| AppError::NotFound("category not found in your group".to_string()))?;

        let feed = feed_repo::create_feed(
            &self.pool,
            actor.id,
            actor.group_id,
            category.id,
            new_feed.title,
            new_feed.description,
        )
        .await?;

        if let Some(url) = new_feed.image {
            feed_repo::add_feed_image(&self.pool, feed.id, url).await?;
        }

        self.load_detail(feed.id, actor).await
    }

    /// Feed detail with derived fields; counts one visit.
    ///
    /// The visit counter is bumped with an atomic update after the row is
    /// read, so the response carries the pre-visit count.
    pub async fn detail(&self, actor: &User, feed_id: Uuid) -> Result<FeedDetail> {
        let row = feed_repo::find_feed_detail(&self.pool, feed_id, Some(actor.id))
            .await?
            .ok_or_else(|| AppError::NotFound("feed not found".to_string()))?;
        check_group_access(Some(actor), row.group_id).into_result()?;

        feed_repo::increment_visited(&self.pool, feed_id).await?;

        let top = comment_repo::top_liked_comment(&self.pool, feed_id).await?;

        Ok(detail_from(row, top.into_iter().map(preview_from).collect()))
    }

    /// Partially update a feed; only the owner may do this
    pub async fn update(
        &self,
        actor: &User,
        feed_id: Uuid,
        changes: FeedChanges<'_>,
    ) -> Result<FeedDetail> {
        let feed = feed_repo::find_feed_by_id(&self.pool, feed_id)
            .await?
            .ok_or_else(|| AppError::NotFound("feed not found".to_string()))?;
        check_mutate(Some(actor), feed.user_id, feed.group_id).into_result()?;

        let category_id = match changes.category_id {
            Some(id) => {
                let group_id = actor
                    .group_id
                    .ok_or_else(|| AppError::NotFound("category not found in your group".to_string()))?;
                let category = group_repo::find_category_in_group(&self.pool, group_id, id)
                    .await?
                    .ok_or_else(|| {
                        AppError::NotFound("category not found in your group".to_string())
                    })?;
                Some(category.id)
            }
            None => None,
        };

        feed_repo::update_feed(
            &self.pool,
            feed_id,
            changes.title,
            changes.description,
            category_id,
        )
        .await?;

        match changes.image {
            Some(Some(url)) => {
                feed_repo::clear_feed_images(&self.pool, feed_id).await?;
                feed_repo::add_feed_image(&self.pool, feed_id, url).await?;
            }
            Some(None) => {
                feed_repo::clear_feed_images(&self.pool, feed_id).await?;
            }
            None => {}
        }

        self.load_detail(feed_id, actor).await
    }

    /// Delete a feed; only the owner may do this
    pub async fn delete(&self, actor: &User, feed_id: Uuid) -> Result<()> {
        let feed = feed_repo::find_feed_by_id(&self.pool, feed_id)
            .await?
            .ok_or_else(|| AppError::NotFound("feed not found".to_string()))?;
        check_mutate(Some(actor), feed.user_id, feed.group_id).into_result()?;

        feed_repo::delete_feed(&self.pool, feed_id).await?;

        Ok(())
    }

    /// Like a feed; a repeat like is a no-op
    pub async fn like(&self, actor: &User, feed_id: Uuid) -> Result<FeedLikeStatus> {
        let feed = feed_repo::find_feed_by_id(&self.pool, feed_id)
            .await?
            .ok_or_else(|| AppError::NotFound("feed not found".to_string()))?;
        check_group_access(Some(actor), feed.group_id).into_result()?;

        like_repo::like_feed(&self.pool, actor.id, feed_id).await?;
        let like_count = like_repo::feed_like_count(&self.pool, feed_id).await?;

        Ok(FeedLikeStatus {
            liked: true,
            like_count,
        })
    }

    /// Remove a like from a feed; removing an absent like is a no-op
    pub async fn unlike(&self, actor: &User, feed_id: Uuid) -> Result<FeedLikeStatus> {
        let feed = feed_repo::find_feed_by_id(&self.pool, feed_id)
            .await?
            .ok_or_else(|| AppError::NotFound("feed not found".to_string()))?;
        check_group_access(Some(actor), feed.group_id).into_result()?;

        like_repo::unlike_feed(&self.pool, actor.id, feed_id).await?;
        let like_count = like_repo::feed_like_count(&self.pool, feed_id).await?;

        Ok(FeedLikeStatus {
            liked: false,
            like_count,
        })
    }

    /// Detail view without the visit side effect (used after writes)
    async fn load_detail(&self, feed_id: Uuid, actor: &User) -> Result<FeedDetail> {
        let row = feed_repo::find_feed_detail(&self.pool, feed_id, Some(actor.id))
            .await?
            .ok_or_else(|| AppError::NotFound("feed not found".to_string()))?;
        let top = comment_repo::top_liked_comment(&self.pool, feed_id).await?;

        Ok(detail_from(row, top.into_iter().map(preview_from).collect()))
    }
}

fn summary_from(row: FeedSummaryRow) -> FeedSummary {
    FeedSummary {
        id: row.id,
        user: UserPreview {
            id: row.user_id,
            username: row.username,
            name: row.user_name,
            avatar: row.user_avatar,
            is_coach: row.user_is_coach,
        },
        group: zip_preview(row.group_id, row.group_name).map(|(id, name)| GroupPreview { id, name }),
        category: zip_preview(row.category_id, row.category_name)
            .map(|(id, name)| CategoryPreview { id, name }),
        title: row.title,
        description: row.description,
        visited: row.visited,
        created_at: row.created_at,
        like_count: row.like_count,
        comments_count: row.comments_count,
        thumbnail: row.thumbnail,
    }
}

fn detail_from(row: FeedDetailRow, highest_like_comments: Vec<CommentPreview>) -> FeedDetail {
    FeedDetail {
        id: row.id,
        user: UserPreview {
            id: row.user_id,
            username: row.username,
            name: row.user_name,
            avatar: row.user_avatar,
            is_coach: row.user_is_coach,
        },
        group: zip_preview(row.group_id, row.group_name).map(|(id, name)| GroupPreview { id, name }),
        category: zip_preview(row.category_id, row.category_name)
            .map(|(id, name)| CategoryPreview { id, name }),
        title: row.title,
        description: row.description,
        visited: row.visited,
        created_at: row.created_at,
        updated_at: row.updated_at,
        like_count: row.like_count,
        comments_count: row.comments_count,
        highest_like_comments,
        thumbnail: row.thumbnail,
        is_like: row.is_like,
    }
}

fn preview_from(row: crate::db::comment_repo::CommentRow) -> CommentPreview {
    CommentPreview {
        id: row.id,
        user: CommentUser {
            id: row.user_id,
            is_coach: row.user_is_coach,
        },
        description: row.description,
        created_at: row.created_at,
        like_count: row.like_count,
    }
}

fn zip_preview(id: Option<Uuid>, name: Option<String>) -> Option<(Uuid, String)> {
    match (id, name) {
        (Some(id), Some(name)) => Some((id, name)),
        _ => None,
    }
}
