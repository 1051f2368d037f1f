use crate::api::RequestContext;
use crate::api::v1::required_uid;
use crate::common::axum_extract::{Caller, Payload};
use crate::common::error::ServiceResponse;
use crate::models::callables::{FriendRequestsResponse, FromUidArgs, SuccessResponse, ToUidArgs};
use crate::usecases::friend_requests;
use axum::Json;

pub async fn send(
    ctx: RequestContext,
    caller: Caller,
    Payload(args): Payload<ToUidArgs>,
) -> ServiceResponse<SuccessResponse> {
    let to_uid = required_uid(args.to_uid)?;
    friend_requests::send(&ctx, &caller.uid, &to_uid).await?;
    Ok(Json(SuccessResponse::default()))
}

pub async fn cancel(
    ctx: RequestContext,
    caller: Caller,
    Payload(args): Payload<ToUidArgs>,
) -> ServiceResponse<SuccessResponse> {
    let to_uid = required_uid(args.to_uid)?;
    friend_requests::cancel(&ctx, &caller.uid, &to_uid).await?;
    Ok(Json(SuccessResponse::default()))
}

pub async fn accept(
    ctx: RequestContext,
    caller: Caller,
    Payload(args): Payload<FromUidArgs>,
) -> ServiceResponse<SuccessResponse> {
    let from_uid = required_uid(args.from_uid)?;
    friend_requests::accept(&ctx, &caller.uid, &from_uid).await?;
    Ok(Json(SuccessResponse::default()))
}

pub async fn reject(
    ctx: RequestContext,
    caller: Caller,
    Payload(args): Payload<FromUidArgs>,
) -> ServiceResponse<SuccessResponse> {
    let from_uid = required_uid(args.from_uid)?;
    friend_requests::reject(&ctx, &caller.uid, &from_uid).await?;
    Ok(Json(SuccessResponse::default()))
}

pub async fn incoming(
    ctx: RequestContext,
    caller: Caller,
) -> ServiceResponse<FriendRequestsResponse> {
    let requests = friend_requests::fetch_incoming(&ctx, &caller.uid).await?;
    Ok(Json(FriendRequestsResponse { requests }))
}

pub async fn outgoing(
    ctx: RequestContext,
    caller: Caller,
) -> ServiceResponse<FriendRequestsResponse> {
    let requests = friend_requests::fetch_outgoing(&ctx, &caller.uid).await?;
    Ok(Json(FriendRequestsResponse { requests }))
}
