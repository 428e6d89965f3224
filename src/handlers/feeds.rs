/// Feed handlers - HTTP endpoints for feed listings, search, and CRUD
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::services::feeds::{FeedChanges, FeedService, NewFeed};
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Deserializer};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
pub struct GroupCategoryQuery {
    pub group_id: Uuid,
    pub category_id: Uuid,
    #[serde(default = "default_page")]
    pub page: i64,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub group_id: Uuid,
    #[serde(default)]
    pub keyword: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchResultQuery {
    pub group_id: Uuid,
    #[serde(default)]
    pub keyword: String,
    #[serde(default = "default_page")]
    pub page: i64,
}

/// Request body for creating a feed
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFeedRequest {
    #[validate(length(min = 1, max = 100, message = "title must be 1 to 100 characters"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Uuid,
    pub image: Option<String>,
}

/// Request body for partial feed update.
///
/// `image` is tri-state: absent leaves images alone, `null` removes them,
/// a URL replaces them.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateFeedRequest {
    #[validate(length(min = 1, max = 100, message = "title must be 1 to 100 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Uuid>,
    #[serde(default, deserialize_with = "double_option")]
    pub image: Option<Option<String>>,
}

/// Keeps `null` distinguishable from an absent field
fn double_option<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// List every feed, newest first, 24 per page
pub async fn list_feeds(
    pool: web::Data<PgPool>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let service = FeedService::new((**pool).clone());
    let page = service.list_recent(query.page).await?;

    Ok(HttpResponse::Ok().json(page))
}

/// List every feed by like count, 24 per page
pub async fn top_like_feeds(
    pool: web::Data<PgPool>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let service = FeedService::new((**pool).clone());
    let page = service.list_popular(query.page).await?;

    Ok(HttpResponse::Ok().json(page))
}

/// List a group's feeds for one category, 12 per page
pub async fn group_category_feeds(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    query: web::Query<GroupCategoryQuery>,
) -> Result<HttpResponse> {
    let service = FeedService::new((**pool).clone());
    let page = service
        .list_group_category(&user.0, query.group_id, query.category_id, query.page)
        .await?;

    Ok(HttpResponse::Ok().json(page))
}

/// Incremental search: up to five title matches
pub async fn group_feed_search(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    let service = FeedService::new((**pool).clone());
    let suggestions = service
        .search_suggestions(&user.0, query.group_id, &query.keyword)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "result": suggestions })))
}

/// Full search results, 12 per page
pub async fn group_feed_search_result(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    query: web::Query<SearchResultQuery>,
) -> Result<HttpResponse> {
    let service = FeedService::new((**pool).clone());
    let page = service
        .search_results(&user.0, query.group_id, &query.keyword, query.page)
        .await?;

    Ok(HttpResponse::Ok().json(page))
}

/// Create a new feed
pub async fn create_feed(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    req: web::Json<CreateFeedRequest>,
) -> Result<HttpResponse> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = FeedService::new((**pool).clone());
    let detail = service
        .create(
            &user.0,
            NewFeed {
                title: &req.title,
                description: &req.description,
                category_id: req.category,
                image: req.image.as_deref(),
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(detail))
}

/// Feed detail; each call counts one visit
pub async fn get_feed(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    feed_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = FeedService::new((**pool).clone());
    let detail = service.detail(&user.0, *feed_id).await?;

    Ok(HttpResponse::Ok().json(detail))
}

/// Partially update a feed
pub async fn update_feed(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    feed_id: web::Path<Uuid>,
    req: web::Json<UpdateFeedRequest>,
) -> Result<HttpResponse> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = FeedService::new((**pool).clone());
    let detail = service
        .update(
            &user.0,
            *feed_id,
            FeedChanges {
                title: req.title.as_deref(),
                description: req.description.as_deref(),
                category_id: req.category,
                image: req.image.as_ref().map(|inner| inner.as_deref()),
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(detail))
}

/// Delete a feed
pub async fn delete_feed(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    feed_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = FeedService::new((**pool).clone());
    service.delete(&user.0, *feed_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
