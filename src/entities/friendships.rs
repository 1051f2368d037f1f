use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const UIDS_FIELD: &str = "uids";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friendship {
    /// Requester first, then the user who accepted.
    pub uids: Vec<String>,
    pub created_at: DateTime<Utc>,
}
