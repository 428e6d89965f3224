/// Comment handlers - HTTP endpoints for comment threads and replies
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::services::CommentService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Request body for creating or editing a comment or recomment
#[derive(Debug, Deserialize, Validate)]
pub struct CommentBody {
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
}

/// The feed's comment thread with anonymized author labels
pub async fn get_feed_comments(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    feed_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = CommentService::new((**pool).clone());
    let thread = service.feed_thread(&user.0, *feed_id).await?;

    Ok(HttpResponse::Ok().json(thread))
}

/// Add a comment to a feed
pub async fn create_comment(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    feed_id: web::Path<Uuid>,
    req: web::Json<CommentBody>,
) -> Result<HttpResponse> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = CommentService::new((**pool).clone());
    let comment = service
        .create_comment(&user.0, *feed_id, &req.description)
        .await?;

    Ok(HttpResponse::Created().json(comment))
}

/// Add a reply under one of the feed's comments
pub async fn create_recomment(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    path: web::Path<(Uuid, Uuid)>,
    req: web::Json<CommentBody>,
) -> Result<HttpResponse> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (feed_id, comment_id) = path.into_inner();
    let service = CommentService::new((**pool).clone());
    let recomment = service
        .create_recomment(&user.0, feed_id, comment_id, &req.description)
        .await?;

    Ok(HttpResponse::Created().json(recomment))
}

/// Edit a comment
pub async fn update_comment(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    path: web::Path<(Uuid, Uuid)>,
    req: web::Json<CommentBody>,
) -> Result<HttpResponse> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (feed_id, comment_id) = path.into_inner();
    let service = CommentService::new((**pool).clone());
    let comment = service
        .update_comment(&user.0, feed_id, comment_id, &req.description)
        .await?;

    Ok(HttpResponse::Ok().json(comment))
}

/// Delete a comment
pub async fn delete_comment(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (feed_id, comment_id) = path.into_inner();
    let service = CommentService::new((**pool).clone());
    service.delete_comment(&user.0, feed_id, comment_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
