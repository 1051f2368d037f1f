use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const OUTGOING_COUNT_FIELD: &str = "outgoingCount";
pub const INCOMING_COUNT_FIELD: &str = "incomingCount";
pub const FRIENDS_COUNT_FIELD: &str = "friendsCount";
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// The identity system owns this document; only the counters are written here.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub outgoing_count: i64,
    #[serde(default)]
    pub incoming_count: i64,
    #[serde(default)]
    pub friends_count: i64,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}
