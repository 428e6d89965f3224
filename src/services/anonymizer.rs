//! Per-response pseudonyms for comment threads.
//!
//! Commenter identities are hidden behind labels that only hold within one
//! rendered response: the feed's owner is always "Author", every other user
//! gets "Anonymous {n}" with n assigned at first encounter in thread order.
//! The number map lives on the stack of a single call and is dropped with
//! it; nothing is persisted or shared across requests or feeds.
use std::collections::HashMap;

use uuid::Uuid;

use super::comments::CommentEntry;

/// Label given to the feed owner wherever they appear in the thread
pub const AUTHOR_LABEL: &str = "Author";

/// Assign display labels to every comment and reply in the thread.
///
/// Traversal order fixes the numbering: each comment is labeled before its
/// replies, replies in order, then the next comment. A user keeps the same
/// number anywhere they reappear in the thread. Owners never consume a
/// number.
pub fn label_thread(thread: &mut [CommentEntry]) {
    let mut numbers: HashMap<Uuid, usize> = HashMap::new();

    for comment in thread.iter_mut() {
        comment.anonymous_label = label_for(&mut numbers, comment.user.id, comment.feed_writer);
        for reply in comment.recomments.iter_mut() {
            reply.anonymous_label = label_for(&mut numbers, reply.user.id, reply.feed_writer);
        }
    }
}

fn label_for(numbers: &mut HashMap<Uuid, usize>, user_id: Uuid, feed_writer: bool) -> String {
    if feed_writer {
        return AUTHOR_LABEL.to_string();
    }
    let next = numbers.len() + 1;
    let n = *numbers.entry(user_id).or_insert(next);
    format!("Anonymous {n}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::comments::{CommentUser, RecommentEntry};
    use chrono::Utc;

    fn comment(user_id: Uuid, feed_writer: bool, replies: Vec<RecommentEntry>) -> CommentEntry {
        CommentEntry {
            id: Uuid::new_v4(),
            user: CommentUser {
                id: user_id,
                is_coach: false,
            },
            description: "comment".to_string(),
            created_at: Utc::now(),
            like_count: 0,
            feed_writer,
            anonymous_label: String::new(),
            recomments: replies,
        }
    }

    fn reply(user_id: Uuid, feed_writer: bool) -> RecommentEntry {
        RecommentEntry {
            id: Uuid::new_v4(),
            user: CommentUser {
                id: user_id,
                is_coach: false,
            },
            description: "reply".to_string(),
            created_at: Utc::now(),
            feed_writer,
            anonymous_label: String::new(),
        }
    }

    fn labels(thread: &[CommentEntry]) -> Vec<&str> {
        thread.iter().map(|c| c.anonymous_label.as_str()).collect()
    }

    #[test]
    fn numbers_are_dense_and_follow_traversal_order() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut thread = vec![
            comment(a, false, vec![]),
            comment(b, false, vec![]),
            comment(c, false, vec![]),
        ];

        label_thread(&mut thread);

        assert_eq!(labels(&thread), ["Anonymous 1", "Anonymous 2", "Anonymous 3"]);
    }

    #[test]
    fn a_user_keeps_their_number_across_comments_and_replies() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut thread = vec![
            comment(a, false, vec![reply(b, false)]),
            comment(b, false, vec![reply(a, false)]),
        ];

        label_thread(&mut thread);

        assert_eq!(thread[0].anonymous_label, "Anonymous 1");
        assert_eq!(thread[0].recomments[0].anonymous_label, "Anonymous 2");
        assert_eq!(thread[1].anonymous_label, "Anonymous 2");
        assert_eq!(thread[1].recomments[0].anonymous_label, "Anonymous 1");
    }

    #[test]
    fn replies_are_numbered_before_the_next_comment() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut thread = vec![comment(a, false, vec![reply(b, false)]), comment(c, false, vec![])];

        label_thread(&mut thread);

        assert_eq!(thread[0].recomments[0].anonymous_label, "Anonymous 2");
        assert_eq!(thread[1].anonymous_label, "Anonymous 3");
    }

    #[test]
    fn the_owner_is_always_author_and_consumes_no_number() {
        let (owner, a) = (Uuid::new_v4(), Uuid::new_v4());
        let mut thread = vec![
            comment(owner, true, vec![reply(a, false)]),
            comment(a, false, vec![reply(owner, true)]),
        ];

        label_thread(&mut thread);

        assert_eq!(thread[0].anonymous_label, AUTHOR_LABEL);
        assert_eq!(thread[1].recomments[0].anonymous_label, AUTHOR_LABEL);
        // The first non-owner still gets number 1.
        assert_eq!(thread[0].recomments[0].anonymous_label, "Anonymous 1");
        assert_eq!(thread[1].anonymous_label, "Anonymous 1");
    }

    #[test]
    fn every_identity_maps_to_exactly_one_label() {
        let users: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let mut thread = vec![
            comment(users[0], false, vec![reply(users[1], false), reply(users[2], false)]),
            comment(users[1], false, vec![reply(users[3], false), reply(users[0], false)]),
            comment(users[2], false, vec![]),
        ];

        label_thread(&mut thread);

        let mut seen: HashMap<Uuid, String> = HashMap::new();
        for entry in &thread {
            let label = seen
                .entry(entry.user.id)
                .or_insert_with(|| entry.anonymous_label.clone());
            assert_eq!(*label, entry.anonymous_label);
            for r in &entry.recomments {
                let label = seen
                    .entry(r.user.id)
                    .or_insert_with(|| r.anonymous_label.clone());
                assert_eq!(*label, r.anonymous_label);
            }
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn relabeling_the_same_thread_is_deterministic() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut thread = vec![
            comment(a, false, vec![reply(b, false)]),
            comment(b, false, vec![]),
        ];

        label_thread(&mut thread);
        let first: Vec<String> = thread.iter().map(|c| c.anonymous_label.clone()).collect();

        label_thread(&mut thread);
        let second: Vec<String> = thread.iter().map(|c| c.anonymous_label.clone()).collect();

        assert_eq!(first, second);
    }
}
