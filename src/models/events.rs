use redis::{FromRedisValue, RedisResult, RedisWrite, ToRedisArgs, Value};
use serde::{Deserialize, Serialize};

pub const CHANNEL_PREFIX: &str = "relationships:";

pub const REQUEST_SENT_CHANNEL: &str = const_str::concat!(CHANNEL_PREFIX, "request_sent");
pub const REQUEST_CANCELED_CHANNEL: &str = const_str::concat!(CHANNEL_PREFIX, "request_canceled");
pub const REQUEST_ACCEPTED_CHANNEL: &str = const_str::concat!(CHANNEL_PREFIX, "request_accepted");
pub const REQUEST_REJECTED_CHANNEL: &str = const_str::concat!(CHANNEL_PREFIX, "request_rejected");
pub const UNFRIENDED_CHANNEL: &str = const_str::concat!(CHANNEL_PREFIX, "unfriended");
pub const BLOCKED_CHANNEL: &str = const_str::concat!(CHANNEL_PREFIX, "blocked");
pub const UNBLOCKED_CHANNEL: &str = const_str::concat!(CHANNEL_PREFIX, "unblocked");
pub const CATEGORY_CHANGED_CHANNEL: &str = const_str::concat!(CHANNEL_PREFIX, "category_changed");

pub const ALL_CHANNELS: [&str; 8] = [
    REQUEST_SENT_CHANNEL,
    REQUEST_CANCELED_CHANNEL,
    REQUEST_ACCEPTED_CHANNEL,
    REQUEST_REJECTED_CHANNEL,
    UNFRIENDED_CHANNEL,
    BLOCKED_CHANNEL,
    UNBLOCKED_CHANNEL,
    CATEGORY_CHANGED_CHANNEL,
];

/// A committed relationship transition, published after the transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum RelationshipEvent {
    RequestSent { from_uid: String, to_uid: String },
    RequestCanceled { from_uid: String, to_uid: String },
    RequestAccepted { from_uid: String, to_uid: String },
    RequestRejected { from_uid: String, to_uid: String },
    Unfriended { uid: String, other_uid: String },
    Blocked { blocker_uid: String, blocked_uid: String },
    Unblocked { blocker_uid: String, blocked_uid: String },
    CategoryChanged { category_id: String },
}

impl RelationshipEvent {
    pub const fn channel(&self) -> &'static str {
        match self {
            RelationshipEvent::RequestSent { .. } => REQUEST_SENT_CHANNEL,
            RelationshipEvent::RequestCanceled { .. } => REQUEST_CANCELED_CHANNEL,
            RelationshipEvent::RequestAccepted { .. } => REQUEST_ACCEPTED_CHANNEL,
            RelationshipEvent::RequestRejected { .. } => REQUEST_REJECTED_CHANNEL,
            RelationshipEvent::Unfriended { .. } => UNFRIENDED_CHANNEL,
            RelationshipEvent::Blocked { .. } => BLOCKED_CHANNEL,
            RelationshipEvent::Unblocked { .. } => UNBLOCKED_CHANNEL,
            RelationshipEvent::CategoryChanged { .. } => CATEGORY_CHANGED_CHANNEL,
        }
    }
}

impl ToRedisArgs for RelationshipEvent {
    fn write_redis_args<W>(&self, out: &mut W)
    where
        W: ?Sized + RedisWrite,
    {
        // plain enum of strings, serialization cannot fail
        let encoded = serde_json::to_string(self).unwrap_or_default();
        encoded.write_redis_args(out);
    }
}

impl FromRedisValue for RelationshipEvent {
    fn from_redis_value(v: &Value) -> RedisResult<Self> {
        let encoded = String::from_redis_value(v)?;
        let event = serde_json::from_str(&encoded).map_err(redis::RedisError::from)?;
        Ok(event)
    }
}
