use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const USER_ID_FIELD: &str = "userId";
pub const FRIEND_IDS_FIELD: &str = "friendIds";
pub const UPDATED_AT_FIELD: &str = "updatedAt";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendCategory {
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub friend_ids: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}
