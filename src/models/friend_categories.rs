use crate::entities::friend_categories::FriendCategory as FriendCategoryEntity;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendCategory {
    pub category_id: String,
    pub user_id: String,
    pub name: String,
    pub friend_ids: Vec<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl FriendCategory {
    pub fn from_entity(category_id: String, value: FriendCategoryEntity) -> Self {
        Self {
            category_id,
            user_id: value.user_id,
            name: value.name,
            friend_ids: value.friend_ids,
            updated_at: value.updated_at,
        }
    }
}
