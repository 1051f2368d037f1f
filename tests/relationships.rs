mod common;

use common::{app, app_with_attempts, counters};
use relationship_service::common::error::{AppError, ErrorKind};
use relationship_service::common::store::DocumentStore;
use relationship_service::entities::blocks::Block;
use relationship_service::entities::friend_categories::FriendCategory;
use relationship_service::entities::friend_requests::FriendRequest;
use relationship_service::entities::friendships::Friendship;
use relationship_service::models::counters::Counters;
use relationship_service::models::events::RelationshipEvent;
use relationship_service::models::friend_requests::FriendRequestStatus;
use relationship_service::models::relationships::RelationshipStatus;
use relationship_service::usecases::{
    blocks, friend_categories, friend_requests, friendships, relationships,
};

#[tokio::test]
async fn sending_a_request_opens_it_and_bumps_both_counters() {
    let app = app();
    friend_requests::send(&app.state, "alice", "bob").await.unwrap();

    let request: FriendRequest = app.get("friend_requests", "alice_bob").await.unwrap();
    assert_eq!(request.status, FriendRequestStatus::Pending);
    assert_eq!(request.from_uid, "alice");
    assert_eq!(request.to_uid, "bob");
    assert_eq!(app.counters("alice").await, counters(1, 0, 0));
    assert_eq!(app.counters("bob").await, counters(0, 1, 0));
}

#[tokio::test]
async fn accepting_creates_the_friendship_and_moves_the_counters() {
    let app = app();
    friend_requests::send(&app.state, "alice", "bob").await.unwrap();
    friend_requests::accept(&app.state, "bob", "alice").await.unwrap();

    let request: FriendRequest = app.get("friend_requests", "alice_bob").await.unwrap();
    assert_eq!(request.status, FriendRequestStatus::Accepted);
    let friendship: Friendship = app.get("friendships", "alice__bob").await.unwrap();
    assert_eq!(friendship.uids, vec!["alice", "bob"]);
    assert_eq!(app.counters("alice").await, counters(0, 0, 1));
    assert_eq!(app.counters("bob").await, counters(0, 0, 1));
    assert_eq!(
        relationships::fetch_status(&app.state, "bob", "alice").await,
        Ok(RelationshipStatus::Friends)
    );
}

#[tokio::test]
async fn requests_between_friends_already_exist() {
    let app = app();
    friend_requests::send(&app.state, "alice", "bob").await.unwrap();
    friend_requests::accept(&app.state, "bob", "alice").await.unwrap();

    let error = friend_requests::send(&app.state, "alice", "bob").await.unwrap_err();
    assert_eq!(error, AppError::RelationshipsAlreadyFriends);
    assert_eq!(error.kind(), ErrorKind::AlreadyExists);
    let error = friend_requests::send(&app.state, "bob", "alice").await.unwrap_err();
    assert_eq!(error, AppError::RelationshipsAlreadyFriends);
    assert_eq!(app.counters("alice").await, counters(0, 0, 1));
}

#[tokio::test]
async fn duplicate_pending_requests_are_rejected() {
    let app = app();
    friend_requests::send(&app.state, "alice", "bob").await.unwrap();
    let error = friend_requests::send(&app.state, "alice", "bob").await.unwrap_err();
    assert_eq!(error, AppError::FriendRequestsAlreadyPending);
    assert_eq!(app.counters("alice").await, counters(1, 0, 0));
}

#[tokio::test]
async fn blocks_forbid_requests_in_both_directions() {
    let app = app();
    blocks::block(&app.state, "alice", "bob").await.unwrap();

    for (from_uid, to_uid) in [("alice", "bob"), ("bob", "alice")] {
        let error = friend_requests::send(&app.state, from_uid, to_uid)
            .await
            .unwrap_err();
        assert_eq!(error, AppError::InteractionBlocked);
        assert_eq!(error.kind(), ErrorKind::PermissionDenied);
    }
    assert_eq!(app.counters("alice").await, Counters::default());
    assert_eq!(app.counters("bob").await, Counters::default());
}

#[tokio::test]
async fn unblocking_twice_reports_not_found_without_side_effects() {
    let app = app();
    friend_requests::send(&app.state, "alice", "carol").await.unwrap();
    blocks::block(&app.state, "alice", "bob").await.unwrap();
    blocks::unblock(&app.state, "alice", "bob").await.unwrap();
    assert!(!app.exists("blocks", "alice_bob").await);
    assert!(!app.exists("blocks", "bob_alice").await);

    let before = (app.counters("alice").await, app.counters("bob").await);
    let error = blocks::unblock(&app.state, "alice", "bob").await.unwrap_err();
    assert_eq!(error, AppError::BlocksNotFound);
    assert_eq!(error.kind(), ErrorKind::NotFound);
    let after = (app.counters("alice").await, app.counters("bob").await);
    assert_eq!(before, after);
}

#[tokio::test]
async fn send_accept_unfriend_is_net_zero() {
    let app = app();
    friend_requests::send(&app.state, "alice", "bob").await.unwrap();
    friend_requests::accept(&app.state, "bob", "alice").await.unwrap();
    friendships::unfriend(&app.state, "alice", "bob").await.unwrap();

    assert_eq!(app.counters("alice").await, Counters::default());
    assert_eq!(app.counters("bob").await, Counters::default());
    assert!(!app.exists("friendships", "alice__bob").await);
    assert!(
        friend_requests::fetch_outgoing(&app.state, "alice")
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(
        relationships::fetch_status(&app.state, "alice", "bob").await,
        Ok(RelationshipStatus::None)
    );

    let error = friendships::unfriend(&app.state, "bob", "alice").await.unwrap_err();
    assert_eq!(error, AppError::FriendshipsNotFound);
}

#[tokio::test]
async fn concurrent_accepts_let_exactly_one_win() {
    let app = app();
    friend_requests::send(&app.state, "alice", "bob").await.unwrap();

    let (first, second) = tokio::join!(
        friend_requests::accept(&app.state, "bob", "alice"),
        friend_requests::accept(&app.state, "bob", "alice"),
    );
    let mut results = [first, second];
    results.sort_by_key(|result| result.is_err());
    assert_eq!(results[0], Ok(()));
    assert_eq!(results[1], Err(AppError::FriendRequestsNotPending));
    assert_eq!(
        results[1].clone().unwrap_err().kind(),
        ErrorKind::FailedPrecondition
    );

    assert_eq!(app.counters("alice").await, counters(0, 0, 1));
    assert_eq!(app.counters("bob").await, counters(0, 0, 1));
}

#[tokio::test]
async fn exhausted_retries_surface_as_internal() {
    let app = app_with_attempts(1);
    friend_requests::send(&app.state, "alice", "bob").await.unwrap();

    let (first, second) = tokio::join!(
        friend_requests::accept(&app.state, "bob", "alice"),
        friend_requests::accept(&app.state, "bob", "alice"),
    );
    let mut results = [first, second];
    results.sort_by_key(|result| result.is_err());
    assert_eq!(results[0], Ok(()));
    assert_eq!(results[1], Err(AppError::TransactionsAborted));
    assert_eq!(AppError::TransactionsAborted.kind(), ErrorKind::Internal);
    assert_eq!(app.counters("bob").await, counters(0, 0, 1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn operations_on_disjoint_pairs_stay_independent() {
    // a single attempt turns any cross-pair conflict into an error
    let app = app_with_attempts(1);
    let mut handles = Vec::new();
    for writer in 0..4 {
        let state = app.state.clone();
        handles.push(tokio::spawn(async move {
            let owner = format!("carol{writer}");
            let mut failures = Vec::new();
            for _ in 0..25 {
                let friend_ids = vec![format!("dave{writer}")];
                if let Err(e) = friend_categories::save(&state, &owner, None, "work", friend_ids).await
                {
                    failures.push(e);
                }
            }
            failures
        }));
    }
    for pair in 0..4 {
        let state = app.state.clone();
        handles.push(tokio::spawn(async move {
            let sender = format!("eve{pair}");
            let mut failures = Vec::new();
            for round in 0..25 {
                let blocker = format!("alice{pair}-{round}");
                let target = format!("bob{pair}-{round}");
                if let Err(e) = blocks::block(&state, &blocker, &target).await {
                    failures.push(e);
                }
                let recipient = format!("frank{pair}-{round}");
                if let Err(e) = friend_requests::send(&state, &sender, &recipient).await {
                    failures.push(e);
                }
            }
            failures
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), Vec::<AppError>::new());
    }
    for pair in 0..4 {
        assert_eq!(
            app.counters(&format!("eve{pair}")).await,
            counters(25, 0, 0)
        );
        for round in [0, 24] {
            assert_eq!(
                app.counters(&format!("frank{pair}-{round}")).await,
                counters(0, 1, 0)
            );
            assert_eq!(
                relationships::fetch_status(
                    &app.state,
                    &format!("alice{pair}-{round}"),
                    &format!("bob{pair}-{round}")
                )
                .await,
                Ok(RelationshipStatus::BlockedByMe)
            );
        }
    }
    for writer in 0..4 {
        let categories: Vec<(String, FriendCategory)> = {
            let mut tx = app.store.begin().await.unwrap();
            tx.query_as("friend_categories", "userId", &format!("carol{writer}"))
                .await
                .unwrap()
        };
        assert_eq!(categories.len(), 25);
    }
}

#[tokio::test]
async fn blocking_a_friend_tears_down_the_friendship_and_categories() {
    let app = app();
    friend_requests::send(&app.state, "alice", "bob").await.unwrap();
    friend_requests::accept(&app.state, "bob", "alice").await.unwrap();
    app.put(
        "friend_categories",
        "study",
        &FriendCategory {
            user_id: "alice".to_owned(),
            name: "study".to_owned(),
            friend_ids: vec!["bob".to_owned(), "carol".to_owned()],
            created_at: None,
            updated_at: None,
        },
    )
    .await;

    let outcome = blocks::block(&app.state, "alice", "bob").await.unwrap();
    assert!(outcome.removed_friendship);
    assert_eq!(outcome.updated_categories, 1);

    assert!(!app.exists("friendships", "alice__bob").await);
    assert_eq!(app.counters("alice").await, counters(0, 0, 0));
    assert_eq!(app.counters("bob").await, counters(0, 0, 0));

    let block: Block = app.get("blocks", "alice_bob").await.unwrap();
    assert!(!block.is_implicit);
    assert!(block.mutual_block);
    let mirror: Block = app.get("blocks", "bob_alice").await.unwrap();
    assert!(mirror.is_implicit);

    let study: FriendCategory = app.get("friend_categories", "study").await.unwrap();
    assert_eq!(study.friend_ids, vec!["carol"]);
}

#[tokio::test]
async fn blocking_cancels_pending_requests_both_ways() {
    let app = app();
    friend_requests::send(&app.state, "alice", "bob").await.unwrap();
    friend_requests::send(&app.state, "bob", "alice").await.unwrap();

    let outcome = blocks::block(&app.state, "bob", "alice").await.unwrap();
    assert_eq!(outcome.canceled_requests, 2);
    assert!(!outcome.removed_friendship);

    for id in ["alice_bob", "bob_alice"] {
        let request: FriendRequest = app.get("friend_requests", id).await.unwrap();
        assert_eq!(request.status, FriendRequestStatus::Canceled);
    }
    assert_eq!(app.counters("alice").await, Counters::default());
    assert_eq!(app.counters("bob").await, Counters::default());
}

#[tokio::test]
async fn block_status_is_seen_from_both_sides() {
    let app = app();
    blocks::block(&app.state, "alice", "bob").await.unwrap();
    assert_eq!(
        relationships::fetch_status(&app.state, "alice", "bob").await,
        Ok(RelationshipStatus::BlockedByMe)
    );
    assert_eq!(
        relationships::fetch_status(&app.state, "bob", "alice").await,
        Ok(RelationshipStatus::BlockedByOther)
    );
    assert_eq!(
        blocks::fetch_blocked(&app.state, "alice").await,
        Ok(vec!["bob".to_owned()])
    );
    assert_eq!(blocks::fetch_blocked(&app.state, "bob").await, Ok(vec![]));
}

#[tokio::test]
async fn only_the_blocker_can_lift_a_block() {
    let app = app();
    blocks::block(&app.state, "alice", "bob").await.unwrap();

    let error = blocks::unblock(&app.state, "bob", "alice").await.unwrap_err();
    assert_eq!(error, AppError::BlocksNotFound);
    assert!(app.exists("blocks", "alice_bob").await);
}

#[tokio::test]
async fn mutual_explicit_blocks_are_lifted_independently() {
    let app = app();
    blocks::block(&app.state, "alice", "bob").await.unwrap();
    blocks::block(&app.state, "bob", "alice").await.unwrap();

    let block: Block = app.get("blocks", "alice_bob").await.unwrap();
    assert!(!block.is_implicit, "an explicit block must not be downgraded");

    blocks::unblock(&app.state, "alice", "bob").await.unwrap();
    let mirror: Block = app.get("blocks", "alice_bob").await.unwrap();
    assert!(mirror.is_implicit);
    assert_eq!(
        relationships::fetch_status(&app.state, "alice", "bob").await,
        Ok(RelationshipStatus::BlockedByOther)
    );
    let error = friend_requests::send(&app.state, "alice", "bob").await.unwrap_err();
    assert_eq!(error, AppError::InteractionBlocked);

    blocks::unblock(&app.state, "bob", "alice").await.unwrap();
    assert!(!app.exists("blocks", "alice_bob").await);
    assert!(!app.exists("blocks", "bob_alice").await);
    friend_requests::send(&app.state, "alice", "bob").await.unwrap();
}

#[tokio::test]
async fn crossed_requests_stay_independently_pending() {
    let app = app();
    friend_requests::send(&app.state, "alice", "bob").await.unwrap();
    friend_requests::send(&app.state, "bob", "alice").await.unwrap();
    assert_eq!(
        relationships::fetch_status(&app.state, "alice", "bob").await,
        Ok(RelationshipStatus::PendingOut)
    );

    friend_requests::accept(&app.state, "bob", "alice").await.unwrap();
    let leftover: FriendRequest = app.get("friend_requests", "bob_alice").await.unwrap();
    assert_eq!(leftover.status, FriendRequestStatus::Pending);
    assert_eq!(app.counters("alice").await, counters(0, 1, 1));

    let error = friend_requests::accept(&app.state, "alice", "bob")
        .await
        .unwrap_err();
    assert_eq!(error, AppError::RelationshipsAlreadyFriends);

    friend_requests::reject(&app.state, "alice", "bob").await.unwrap();
    assert_eq!(app.counters("alice").await, counters(0, 0, 1));
    assert_eq!(app.counters("bob").await, counters(0, 0, 1));
}

#[tokio::test]
async fn resolving_requests_checks_existence_and_status() {
    let app = app();
    let error = friend_requests::cancel(&app.state, "alice", "bob").await.unwrap_err();
    assert_eq!(error, AppError::FriendRequestsNotFound);

    friend_requests::send(&app.state, "alice", "bob").await.unwrap();
    friend_requests::cancel(&app.state, "alice", "bob").await.unwrap();
    assert_eq!(app.counters("alice").await, Counters::default());

    let error = friend_requests::reject(&app.state, "bob", "alice").await.unwrap_err();
    assert_eq!(error, AppError::FriendRequestsNotPending);

    // the same key is reused for a fresh request
    friend_requests::send(&app.state, "alice", "bob").await.unwrap();
    let incoming = friend_requests::fetch_incoming(&app.state, "bob").await.unwrap();
    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0].from_uid, "alice");
    assert_eq!(app.counters("bob").await, counters(0, 1, 0));
}

#[tokio::test]
async fn malformed_or_self_targeted_ids_are_invalid() {
    let app = app();
    let error = friend_requests::send(&app.state, "alice", "alice").await.unwrap_err();
    assert_eq!(error, AppError::RelationshipsSelfTarget);
    assert_eq!(error.kind(), ErrorKind::InvalidArgument);

    for target in ["", "a_b", "a/b"] {
        let error = friend_requests::send(&app.state, "alice", target).await.unwrap_err();
        assert_eq!(error, AppError::UsersInvalidId);
    }
    let error = blocks::block(&app.state, "alice", "alice").await.unwrap_err();
    assert_eq!(error, AppError::RelationshipsSelfTarget);
}

#[tokio::test]
async fn committed_transitions_are_published() {
    let app = app();
    let mut events = app.events.subscribe();
    friend_requests::send(&app.state, "alice", "bob").await.unwrap();
    friend_requests::accept(&app.state, "bob", "alice").await.unwrap();
    let _ = friend_requests::send(&app.state, "alice", "bob").await;

    assert_eq!(
        events.recv().await.unwrap(),
        RelationshipEvent::RequestSent {
            from_uid: "alice".to_owned(),
            to_uid: "bob".to_owned(),
        }
    );
    assert_eq!(
        events.recv().await.unwrap(),
        RelationshipEvent::RequestAccepted {
            from_uid: "alice".to_owned(),
            to_uid: "bob".to_owned(),
        }
    );
    assert!(events.try_recv().is_err(), "failed transitions publish nothing");
}

#[tokio::test]
async fn friends_are_listed_from_either_side() {
    let app = app();
    for other in ["carol", "bob"] {
        friend_requests::send(&app.state, "alice", other).await.unwrap();
        friend_requests::accept(&app.state, other, "alice").await.unwrap();
    }
    assert_eq!(
        friendships::fetch_friends(&app.state, "alice").await,
        Ok(vec!["bob".to_owned(), "carol".to_owned()])
    );
    assert_eq!(
        friendships::fetch_friends(&app.state, "bob").await,
        Ok(vec!["alice".to_owned()])
    );
}
