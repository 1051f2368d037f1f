use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

pub type ServiceResult<T> = Result<T, AppError>;
pub type ServiceResponse<T> = ServiceResult<Json<T>>;

#[track_caller]
pub fn unexpected<T, E: Into<anyhow::Error>>(e: E) -> ServiceResult<T> {
    let caller = std::panic::Location::caller();
    error!("An unexpected error has occurred at {caller}: {}", e.into());
    Err(AppError::Unexpected)
}

/// Coarse failure classes reported to callers alongside the specific code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthenticated,
    InvalidArgument,
    AlreadyExists,
    NotFound,
    FailedPrecondition,
    PermissionDenied,
    Internal,
}

impl ErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::InvalidArgument => "invalid-argument",
            ErrorKind::AlreadyExists => "already-exists",
            ErrorKind::NotFound => "not-found",
            ErrorKind::FailedPrecondition => "failed-precondition",
            ErrorKind::PermissionDenied => "permission-denied",
            ErrorKind::Internal => "internal",
        }
    }

    pub const fn http_status_code(&self) -> StatusCode {
        match self {
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorKind::AlreadyExists => StatusCode::CONFLICT,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::FailedPrecondition => StatusCode::PRECONDITION_FAILED,
            ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    Unexpected,
    Unauthenticated,
    DecodingRequestFailed,
    InteractionBlocked,

    TransactionsAborted,

    UsersInvalidId,

    RelationshipsSelfTarget,
    RelationshipsAlreadyFriends,

    FriendRequestsAlreadyPending,
    FriendRequestsNotFound,
    FriendRequestsNotPending,
    FriendRequestsNotSender,
    FriendRequestsNotRecipient,

    FriendshipsNotFound,

    BlocksNotFound,

    FriendCategoriesNotFound,
    FriendCategoriesNotOwner,
    FriendCategoriesInvalidName,
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    #[track_caller]
    fn from(e: E) -> Self {
        unexpected::<(), E>(e).unwrap_err()
    }
}

impl AppError {
    pub const fn code(&self) -> &'static str {
        match self {
            AppError::Unexpected => "unexpected",
            AppError::Unauthenticated => "unauthenticated",
            AppError::DecodingRequestFailed => "decoding_request_failed",
            AppError::InteractionBlocked => "interaction_blocked",

            AppError::TransactionsAborted => "transactions.aborted",

            AppError::UsersInvalidId => "users.invalid_id",

            AppError::RelationshipsSelfTarget => "relationships.self_target",
            AppError::RelationshipsAlreadyFriends => "relationships.already_friends",

            AppError::FriendRequestsAlreadyPending => "friend_requests.already_pending",
            AppError::FriendRequestsNotFound => "friend_requests.not_found",
            AppError::FriendRequestsNotPending => "friend_requests.not_pending",
            AppError::FriendRequestsNotSender => "friend_requests.not_sender",
            AppError::FriendRequestsNotRecipient => "friend_requests.not_recipient",

            AppError::FriendshipsNotFound => "friendships.not_found",

            AppError::BlocksNotFound => "blocks.not_found",

            AppError::FriendCategoriesNotFound => "friend_categories.not_found",
            AppError::FriendCategoriesNotOwner => "friend_categories.not_owner",
            AppError::FriendCategoriesInvalidName => "friend_categories.invalid_name",
        }
    }

    pub const fn message(&self) -> &'static str {
        match self {
            AppError::Unexpected => "An unexpected error has occurred.",
            AppError::Unauthenticated => "You must be signed in to perform this action.",
            AppError::DecodingRequestFailed => "Failed to decode request",
            AppError::InteractionBlocked => {
                "You do not have permission to interact with this user."
            }

            AppError::TransactionsAborted => {
                "The request could not be completed due to concurrent changes. Please try again."
            }

            AppError::UsersInvalidId => "The user id is invalid.",

            AppError::RelationshipsSelfTarget => "You cannot perform this action on yourself.",
            AppError::RelationshipsAlreadyFriends => "You are already friends with this user.",

            AppError::FriendRequestsAlreadyPending => {
                "You have already sent a friend request to this user."
            }
            AppError::FriendRequestsNotFound => "The friend request could not be found.",
            AppError::FriendRequestsNotPending => "Only pending friend requests can be changed.",
            AppError::FriendRequestsNotSender => {
                "Only the sender of a friend request can cancel it."
            }
            AppError::FriendRequestsNotRecipient => {
                "Only the recipient of a friend request can answer it."
            }

            AppError::FriendshipsNotFound => "The friendship could not be found.",

            AppError::BlocksNotFound => "The block could not be found.",

            AppError::FriendCategoriesNotFound => "The friend category could not be found.",
            AppError::FriendCategoriesNotOwner => "You do not own this friend category.",
            AppError::FriendCategoriesInvalidName => "The friend category name is invalid.",
        }
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            AppError::Unauthenticated => ErrorKind::Unauthenticated,

            AppError::DecodingRequestFailed
            | AppError::UsersInvalidId
            | AppError::RelationshipsSelfTarget
            | AppError::FriendCategoriesInvalidName => ErrorKind::InvalidArgument,

            AppError::RelationshipsAlreadyFriends | AppError::FriendRequestsAlreadyPending => {
                ErrorKind::AlreadyExists
            }

            AppError::FriendRequestsNotFound
            | AppError::FriendshipsNotFound
            | AppError::BlocksNotFound
            | AppError::FriendCategoriesNotFound => ErrorKind::NotFound,

            AppError::FriendRequestsNotPending => ErrorKind::FailedPrecondition,

            AppError::InteractionBlocked
            | AppError::FriendRequestsNotSender
            | AppError::FriendRequestsNotRecipient
            | AppError::FriendCategoriesNotOwner => ErrorKind::PermissionDenied,

            AppError::Unexpected | AppError::TransactionsAborted => ErrorKind::Internal,
        }
    }

    pub const fn http_status_code(&self) -> StatusCode {
        self.kind().http_status_code()
    }

    pub const fn response_parts(&self) -> (StatusCode, Json<ErrorResponse>) {
        let status = self.http_status_code();
        let response = ErrorResponse {
            kind: self.kind().as_str(),
            code: self.code(),
            message: self.message(),
        };
        (status, Json(response))
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub kind: &'static str,
    pub code: &'static str,
    pub message: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.response_parts().into_response()
    }
}
