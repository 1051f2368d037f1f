use crate::models::counters::Counters;
use crate::models::friend_categories::FriendCategory;
use crate::models::friend_requests::FriendRequest;
use crate::models::relationships::RelationshipStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToUidArgs {
    pub to_uid: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FromUidArgs {
    pub from_uid: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherUidArgs {
    pub other_uid: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetUidArgs {
    pub target_uid: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveFriendCategoryArgs {
    pub category_id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub friend_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl Default for SuccessResponse {
    fn default() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipStatusResponse {
    pub uid: String,
    pub status: RelationshipStatus,
}

#[derive(Debug, Serialize)]
pub struct UidsResponse {
    pub uids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FriendRequestsResponse {
    pub requests: Vec<FriendRequest>,
}

#[derive(Debug, Serialize)]
pub struct CountersResponse {
    #[serde(flatten)]
    pub counters: Counters,
}

#[derive(Debug, Serialize)]
pub struct FriendCategoryResponse {
    pub category: FriendCategory,
}
