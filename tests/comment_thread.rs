//! End-to-end checks over the pure core: thread assembly, label
//! anonymization, and the listing page envelope.
use chrono::{Duration, Utc};
use uuid::Uuid;

use community_service::db::comment_repo::{CommentRow, RecommentRow};
use community_service::services::anonymizer::{label_thread, AUTHOR_LABEL};
use community_service::services::comments::assemble_thread;
use community_service::services::pagination::{resolve_page, Page, GLOBAL_PAGE_SIZE};

fn comment_row(id: Uuid, user_id: Uuid, feed_id: Uuid, minutes: i64) -> CommentRow {
    CommentRow {
        id,
        feed_id,
        user_id,
        user_is_coach: false,
        description: format!("comment at +{minutes}m"),
        created_at: Utc::now() + Duration::minutes(minutes),
        like_count: 0,
    }
}

fn recomment_row(comment_id: Uuid, user_id: Uuid, minutes: i64) -> RecommentRow {
    RecommentRow {
        id: Uuid::new_v4(),
        comment_id,
        user_id,
        user_is_coach: false,
        description: format!("reply at +{minutes}m"),
        created_at: Utc::now() + Duration::minutes(minutes),
    }
}

#[test]
fn a_rendered_thread_carries_stable_dense_labels() {
    let feed_id = Uuid::new_v4();
    let owner = Uuid::new_v4();
    let (alice, bob, carol) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let (c1, c2, c3) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

    let comments = vec![
        comment_row(c1, alice, feed_id, 0),
        comment_row(c2, owner, feed_id, 1),
        comment_row(c3, bob, feed_id, 2),
    ];
    let recomments = vec![
        recomment_row(c1, bob, 3),
        recomment_row(c1, owner, 4),
        recomment_row(c3, carol, 5),
        recomment_row(c3, alice, 6),
    ];

    let mut thread = assemble_thread(comments, recomments, owner);
    label_thread(&mut thread);

    // Comment authors: alice first, then the owner, then bob. Bob's number
    // was already assigned by his reply under the first comment.
    assert_eq!(thread[0].anonymous_label, "Anonymous 1");
    assert_eq!(thread[1].anonymous_label, AUTHOR_LABEL);
    assert_eq!(thread[2].anonymous_label, "Anonymous 2");

    // Replies under the first comment: bob got number 2, the owner stays
    // "Author" and consumes nothing.
    assert_eq!(thread[0].recomments[0].anonymous_label, "Anonymous 2");
    assert_eq!(thread[0].recomments[1].anonymous_label, AUTHOR_LABEL);

    // Carol is the third distinct non-owner; alice keeps her number.
    assert_eq!(thread[2].recomments[0].anonymous_label, "Anonymous 3");
    assert_eq!(thread[2].recomments[1].anonymous_label, "Anonymous 1");

    // Rendering again from scratch yields the same assignment.
    let mut again = thread.clone();
    label_thread(&mut again);
    for (a, b) in thread.iter().zip(again.iter()) {
        assert_eq!(a.anonymous_label, b.anonymous_label);
    }
}

#[test]
fn listing_envelope_reports_the_paginator_contract() {
    let window = resolve_page(50, GLOBAL_PAGE_SIZE, 1).unwrap();
    let page = Page::new(window, vec!["feed"; 24]);

    assert_eq!(page.total_pages, 3);
    assert_eq!(page.now_page, 1);
    assert_eq!(page.count, 50);
    assert_eq!(page.results.len(), 24);

    assert!(resolve_page(50, GLOBAL_PAGE_SIZE, 4).is_err());
}
