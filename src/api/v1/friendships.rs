use crate::api::RequestContext;
use crate::api::v1::required_uid;
use crate::common::axum_extract::{Caller, Payload};
use crate::common::error::ServiceResponse;
use crate::models::callables::{OtherUidArgs, SuccessResponse, UidsResponse};
use crate::usecases::friendships;
use axum::Json;

pub async fn unfriend(
    ctx: RequestContext,
    caller: Caller,
    Payload(args): Payload<OtherUidArgs>,
) -> ServiceResponse<SuccessResponse> {
    let other_uid = required_uid(args.other_uid)?;
    friendships::unfriend(&ctx, &caller.uid, &other_uid).await?;
    Ok(Json(SuccessResponse::default()))
}

pub async fn friends(ctx: RequestContext, caller: Caller) -> ServiceResponse<UidsResponse> {
    let uids = friendships::fetch_friends(&ctx, &caller.uid).await?;
    Ok(Json(UidsResponse { uids }))
}
