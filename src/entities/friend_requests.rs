use crate::models::friend_requests::FriendRequestStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const FROM_UID_FIELD: &str = "fromUid";
pub const TO_UID_FIELD: &str = "toUid";
pub const STATUS_FIELD: &str = "status";
pub const UPDATED_AT_FIELD: &str = "updatedAt";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    pub from_uid: String,
    pub to_uid: String,
    pub status: FriendRequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
