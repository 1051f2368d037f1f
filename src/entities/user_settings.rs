use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default)]
    pub notifications: NotificationPreferences,
}

/// Missing preferences count as enabled.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct NotificationPreferences {
    #[serde(default)]
    pub all_notifications: Option<bool>,
    #[serde(default)]
    pub friend_request: Option<bool>,
    #[serde(default)]
    pub friend_accepted: Option<bool>,
}
