/// HTTP handlers for the community endpoints
///
/// Thin layer: extract the actor, run the permission checks that need no
/// data, hand off to the service layer, shape the HTTP response. All error
/// paths ride on `AppError`.
pub mod comments;
pub mod feeds;
pub mod likes;

// Re-export handler functions at module level
pub use comments::{
    create_comment, create_recomment, delete_comment, get_feed_comments, update_comment,
};
pub use feeds::{
    create_feed, delete_feed, get_feed, group_category_feeds, group_feed_search,
    group_feed_search_result, list_feeds, top_like_feeds, update_feed,
};
pub use likes::{like_comment, like_feed, unlike_comment, unlike_feed};
