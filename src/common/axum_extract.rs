use crate::common::error::{AppError, ServiceResult};
use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Header carrying the uid the gateway has already authenticated.
pub const CALLER_UID_HEADER: &str = "X-Caller-Uid";

pub struct Caller {
    pub uid: String,
}

fn get_caller(parts: &Parts) -> ServiceResult<Caller> {
    let Some(header) = parts.headers.get(CALLER_UID_HEADER) else {
        return Err(AppError::Unauthenticated);
    };
    let uid = header
        .to_str()
        .map_err(|_| AppError::Unauthenticated)?
        .trim();
    match uid.is_empty() {
        true => Err(AppError::Unauthenticated),
        false => Ok(Caller {
            uid: uid.to_owned(),
        }),
    }
}

impl<S: Sync + Send> FromRequestParts<S> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        get_caller(parts)
    }
}

/// JSON body whose decoding failures surface as `DecodingRequestFailed`.
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    S: Sync + Send,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Payload(value)),
            Err(rejection) => {
                debug!("Rejected request payload: {rejection}");
                Err(AppError::DecodingRequestFailed)
            }
        }
    }
}
