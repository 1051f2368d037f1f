use crate::common::context::Context;
use crate::common::error::ServiceResult;
use crate::common::pair_keys::validate_pair;
use crate::common::store::Transaction;
use crate::entities::notifications::Notification;
use crate::entities::user_settings::NotificationPreferences;
use crate::entities::users::User;
use crate::repositories::{notifications, user_settings, users};
use crate::usecases::transactions::{self, Transition};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

const FALLBACK_ACTOR_NAME: &str = "User";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    FriendRequest,
    FriendAccepted,
}

impl NotificationKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::FriendRequest => "friend_request",
            NotificationKind::FriendAccepted => "friend_accepted",
        }
    }

    /// Missing preferences count as enabled.
    fn is_enabled(&self, preferences: &NotificationPreferences) -> bool {
        let kind_enabled = match self {
            NotificationKind::FriendRequest => preferences.friend_request,
            NotificationKind::FriendAccepted => preferences.friend_accepted,
        };
        preferences.all_notifications != Some(false) && kind_enabled != Some(false)
    }
}

fn actor_name(actor: Option<User>) -> String {
    actor
        .and_then(|user| {
            let nickname = user.nickname.filter(|name| !name.is_empty());
            nickname.or(user.display_name.filter(|name| !name.is_empty()))
        })
        .unwrap_or_else(|| FALLBACK_ACTOR_NAME.to_owned())
}

struct CreateNotification<'a> {
    kind: NotificationKind,
    recipient_uid: &'a str,
    actor_uid: &'a str,
}

#[async_trait]
impl<'a> Transition for CreateNotification<'a> {
    type Output = Option<Uuid>;

    const NAME: &'static str = "create_notification";

    async fn apply(&self, tx: &mut Transaction) -> ServiceResult<Option<Uuid>> {
        let settings = user_settings::fetch_one(tx, self.recipient_uid).await?;
        let actor = users::fetch_one(tx, self.actor_uid).await?;

        let preferences = settings.unwrap_or_default().notifications;
        if !self.kind.is_enabled(&preferences) {
            return Ok(None);
        }

        let actor_name = actor_name(actor);
        let data = match self.kind {
            NotificationKind::FriendRequest => json!({
                "fromUid": self.actor_uid,
                "fromName": actor_name,
            }),
            NotificationKind::FriendAccepted => json!({
                "accepterUid": self.actor_uid,
                "accepterName": actor_name,
            }),
        };
        let notification = Notification {
            user_id: self.recipient_uid.to_owned(),
            title: self.kind.as_str().to_owned(),
            message: String::new(),
            kind: self.kind.as_str().to_owned(),
            actor_id: self.actor_uid.to_owned(),
            actor_name,
            data,
            created_at: Utc::now(),
            is_read: false,
        };
        let notification_id = notifications::create(tx, &notification)?;
        Ok(Some(notification_id))
    }
}

async fn notify<C: Context>(
    ctx: &C,
    kind: NotificationKind,
    recipient_uid: &str,
    actor_uid: &str,
) -> ServiceResult<Option<Uuid>> {
    let (recipient_uid, actor_uid) = validate_pair(recipient_uid, actor_uid)?;
    let transition = CreateNotification {
        kind,
        recipient_uid,
        actor_uid,
    };
    let notification_id = transactions::run(ctx, &transition).await?;
    match notification_id {
        Some(notification_id) => info!(
            kind = kind.as_str(),
            recipient_uid,
            actor_uid,
            %notification_id,
            "Notification created"
        ),
        None => info!(
            kind = kind.as_str(),
            recipient_uid,
            "Notification skipped, disabled by recipient"
        ),
    }
    Ok(notification_id)
}

/// Tells `to_uid` about a request `from_uid` just sent.
pub async fn notify_friend_request<C: Context>(
    ctx: &C,
    from_uid: &str,
    to_uid: &str,
) -> ServiceResult<Option<Uuid>> {
    notify(ctx, NotificationKind::FriendRequest, to_uid, from_uid).await
}

/// Tells the original requester `from_uid` that `to_uid` accepted.
pub async fn notify_friend_accepted<C: Context>(
    ctx: &C,
    from_uid: &str,
    to_uid: &str,
) -> ServiceResult<Option<Uuid>> {
    notify(ctx, NotificationKind::FriendAccepted, from_uid, to_uid).await
}
