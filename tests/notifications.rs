mod common;

use common::{TestApp, app};
use relationship_service::common::store::DocumentStore;
use relationship_service::entities::friend_categories::FriendCategory;
use relationship_service::entities::notifications::Notification;
use relationship_service::entities::user_settings::{NotificationPreferences, UserSettings};
use relationship_service::entities::users::User;
use relationship_service::models::events::RelationshipEvent;
use relationship_service::usecases::{blocks, friend_requests, notifications};
use relationship_service::workers::daemons::notification_consumer;
use relationship_service::workers::daemons::notification_consumer::handlers;
use std::time::Duration;

async fn notifications_for(app: &TestApp, uid: &str) -> Vec<Notification> {
    let mut tx = app.store.begin().await.unwrap();
    let found: Vec<(String, Notification)> =
        tx.query_as("notifications", "userId", uid).await.unwrap();
    found.into_iter().map(|(_, notification)| notification).collect()
}

async fn seed_user(app: &TestApp, uid: &str, nickname: Option<&str>, display_name: Option<&str>) {
    let user = User {
        nickname: nickname.map(str::to_owned),
        display_name: display_name.map(str::to_owned),
        ..Default::default()
    };
    app.put("users", uid, &user).await;
}

#[tokio::test]
async fn friend_requests_notify_the_recipient() {
    let app = app();
    seed_user(&app, "alice", Some("ally"), Some("Alice")).await;

    let notification_id = notifications::notify_friend_request(&app.state, "alice", "bob")
        .await
        .unwrap()
        .unwrap();
    let notification: Notification = app
        .get("notifications", &notification_id.to_string())
        .await
        .unwrap();
    assert_eq!(notification.user_id, "bob");
    assert_eq!(notification.kind, "friend_request");
    assert_eq!(notification.actor_id, "alice");
    assert_eq!(notification.actor_name, "ally");
    assert_eq!(notification.data["fromUid"], "alice");
    assert!(!notification.is_read);
}

#[tokio::test]
async fn accepted_requests_notify_the_requester() {
    let app = app();
    seed_user(&app, "bob", None, Some("Bob")).await;

    notifications::notify_friend_accepted(&app.state, "alice", "bob")
        .await
        .unwrap();
    let received = notifications_for(&app, "alice").await;
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].kind, "friend_accepted");
    assert_eq!(received[0].actor_id, "bob");
    assert_eq!(received[0].actor_name, "Bob");
}

#[tokio::test]
async fn recipients_can_opt_out() {
    let app = app();
    let settings = UserSettings {
        notifications: NotificationPreferences {
            friend_request: Some(false),
            ..Default::default()
        },
    };
    app.put("user_settings", "bob", &settings).await;

    let created = notifications::notify_friend_request(&app.state, "alice", "bob")
        .await
        .unwrap();
    assert_eq!(created, None);
    assert!(notifications_for(&app, "bob").await.is_empty());

    let settings = UserSettings {
        notifications: NotificationPreferences {
            all_notifications: Some(false),
            ..Default::default()
        },
    };
    app.put("user_settings", "alice", &settings).await;
    let created = notifications::notify_friend_accepted(&app.state, "alice", "bob")
        .await
        .unwrap();
    assert_eq!(created, None);
}

#[tokio::test]
async fn unknown_actors_fall_back_to_a_generic_name() {
    let app = app();
    notifications::notify_friend_request(&app.state, "ghost", "bob")
        .await
        .unwrap();
    let received = notifications_for(&app, "bob").await;
    assert_eq!(received[0].actor_name, "User");
}

#[tokio::test]
async fn dispatch_syncs_changed_categories_and_ignores_the_rest() {
    let app = app();
    blocks::block(&app.state, "alice", "bob").await.unwrap();
    app.put(
        "friend_categories",
        "study",
        &FriendCategory {
            user_id: "alice".to_owned(),
            name: "study".to_owned(),
            friend_ids: vec!["bob".to_owned()],
            created_at: None,
            updated_at: None,
        },
    )
    .await;

    let event = RelationshipEvent::CategoryChanged {
        category_id: "study".to_owned(),
    };
    handlers::dispatch(&app.state, event).await.unwrap();
    let study: FriendCategory = app.get("friend_categories", "study").await.unwrap();
    assert!(study.friend_ids.is_empty());

    let event = RelationshipEvent::Unblocked {
        blocker_uid: "alice".to_owned(),
        blocked_uid: "bob".to_owned(),
    };
    handlers::dispatch(&app.state, event).await.unwrap();
}

#[tokio::test]
async fn local_consumer_reacts_to_published_events() {
    let app = app();
    let receiver = app.events.subscribe();
    tokio::spawn(notification_consumer::consume_local(
        app.state.clone(),
        receiver,
    ));

    friend_requests::send(&app.state, "alice", "bob").await.unwrap();

    let mut received = Vec::new();
    for _ in 0..100 {
        received = notifications_for(&app, "bob").await;
        if !received.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].kind, "friend_request");
}
