use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const USER_ID_FIELD: &str = "userId";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub actor_id: String,
    pub actor_name: String,
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}
