pub mod blocks;
pub mod friend_categories;
pub mod friend_requests;
pub mod friendships;
pub mod relationships;

use crate::common::error::{AppError, ServiceResult};
use crate::common::state::AppState;
use axum::Router;
use axum::routing::{delete, get, post};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sendFriendRequest", post(friend_requests::send))
        .route("/cancelFriendRequest", post(friend_requests::cancel))
        .route("/acceptFriendRequest", post(friend_requests::accept))
        .route("/rejectFriendRequest", post(friend_requests::reject))
        .route("/friendRequests/incoming", get(friend_requests::incoming))
        .route("/friendRequests/outgoing", get(friend_requests::outgoing))
        .route("/unfriend", post(friendships::unfriend))
        .route("/friends", get(friendships::friends))
        .route("/blockUser", post(blocks::block))
        .route("/unblockUser", post(blocks::unblock))
        .route("/blocks", get(blocks::blocked))
        .route("/relationships/{uid}", get(relationships::status))
        .route("/counters", get(relationships::counters))
        .route("/friendCategories", post(friend_categories::save))
        .route(
            "/friendCategories/{category_id}",
            delete(friend_categories::delete),
        )
}

/// Payload ids are optional on the wire; a missing one is an invalid id.
pub(crate) fn required_uid(uid: Option<String>) -> ServiceResult<String> {
    uid.ok_or(AppError::UsersInvalidId)
}
