/// Database access layer
///
/// Repository functions over `sqlx::PgPool`, one module per entity family.
/// Everything returns `Result<_, sqlx::Error>`; the service layer maps
/// storage errors into `AppError`.
pub mod comment_repo;
pub mod feed_repo;
pub mod group_repo;
pub mod like_repo;
pub mod user_repo;
