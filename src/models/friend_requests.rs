use crate::entities::friend_requests::FriendRequest as FriendRequestEntity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FriendRequestStatus {
    Pending,
    Accepted,
    Rejected,
    Canceled,
}

impl FriendRequestStatus {
    pub const fn is_pending(&self) -> bool {
        matches!(self, FriendRequestStatus::Pending)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            FriendRequestStatus::Pending => "PENDING",
            FriendRequestStatus::Accepted => "ACCEPTED",
            FriendRequestStatus::Rejected => "REJECTED",
            FriendRequestStatus::Canceled => "CANCELED",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    pub from_uid: String,
    pub to_uid: String,
    pub status: FriendRequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FriendRequestEntity> for FriendRequest {
    fn from(value: FriendRequestEntity) -> Self {
        Self {
            from_uid: value.from_uid,
            to_uid: value.to_uid,
            status: value.status,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
