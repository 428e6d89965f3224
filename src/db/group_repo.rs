use crate::models::{Category, Group};
use sqlx::PgPool;
use uuid::Uuid;

/// Find a group by ID
pub async fn find_group_by_id(pool: &PgPool, group_id: Uuid) -> Result<Option<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>(
        r#"
        SELECT id, name, created_at
        FROM groups
        WHERE id = $1
        "#,
    )
    .bind(group_id)
    .fetch_optional(pool)
    .await
}

/// Find a category by ID, in any group
pub async fn find_category_by_id(
    pool: &PgPool,
    category_id: Uuid,
) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT id, group_id, name, created_at
        FROM categories
        WHERE id = $1
        "#,
    )
    .bind(category_id)
    .fetch_optional(pool)
    .await
}

/// Find a category that belongs to the given group.
///
/// Feed creation and edits resolve their category through this so a user can
/// never file a feed under another group's category.
pub async fn find_category_in_group(
    pool: &PgPool,
    group_id: Uuid,
    category_id: Uuid,
) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT id, group_id, name, created_at
        FROM categories
        WHERE id = $1 AND group_id = $2
        "#,
    )
    .bind(category_id)
    .bind(group_id)
    .fetch_optional(pool)
    .await
}
