use serde::Serialize;

/// How a user sees their relation to another user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipStatus {
    None,
    PendingOut,
    PendingIn,
    Friends,
    BlockedByMe,
    BlockedByOther,
}
