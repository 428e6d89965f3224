/// Like handlers - idempotent like/unlike for feeds and comments
use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::services::{CommentService, FeedService};
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

/// Like a feed; repeating the request changes nothing
pub async fn like_feed(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    feed_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = FeedService::new((**pool).clone());
    let status = service.like(&user.0, *feed_id).await?;

    Ok(HttpResponse::Ok().json(status))
}

/// Withdraw a like from a feed
pub async fn unlike_feed(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    feed_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = FeedService::new((**pool).clone());
    let status = service.unlike(&user.0, *feed_id).await?;

    Ok(HttpResponse::Ok().json(status))
}

/// Like a comment; repeating the request changes nothing
pub async fn like_comment(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (feed_id, comment_id) = path.into_inner();
    let service = CommentService::new((**pool).clone());
    let status = service.like_comment(&user.0, feed_id, comment_id).await?;

    Ok(HttpResponse::Ok().json(status))
}

/// Withdraw a like from a comment
pub async fn unlike_comment(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (feed_id, comment_id) = path.into_inner();
    let service = CommentService::new((**pool).clone());
    let status = service.unlike_comment(&user.0, feed_id, comment_id).await?;

    Ok(HttpResponse::Ok().json(status))
}
