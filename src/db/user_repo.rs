use crate::models::User;
use sqlx::PgPool;
use uuid::Uuid;

/// Look up the acting user for an authenticated request.
///
/// Account creation and credential management belong to the auth service;
/// this service only ever reads user rows.
pub async fn find_user_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, name, email, avatar, group_id,
               is_coach, is_staff, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}
