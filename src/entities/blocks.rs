use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const BLOCKER_FIELD: &str = "blocker";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub blocker: String,
    pub blocked: String,
    #[serde(default)]
    pub is_implicit: bool,
    #[serde(default)]
    pub mutual_block: bool,
    pub created_at: DateTime<Utc>,
}
