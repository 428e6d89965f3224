/// Business logic layer
///
/// - Feed service: listings, filtering, search, feed CRUD, feed likes
/// - Comment service: thread assembly, comment/recomment CRUD, comment likes
/// - Anonymizer: per-response pseudonym labels for comment threads
/// - Pagination: page-window math and the listing envelope
pub mod anonymizer;
pub mod comments;
pub mod feeds;
pub mod pagination;

// Re-export commonly used services
pub use comments::CommentService;
pub use feeds::FeedService;
