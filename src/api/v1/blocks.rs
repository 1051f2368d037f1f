use crate::api::RequestContext;
use crate::api::v1::required_uid;
use crate::common::axum_extract::{Caller, Payload};
use crate::common::error::ServiceResponse;
use crate::models::callables::{SuccessResponse, TargetUidArgs, UidsResponse};
use crate::usecases::blocks;
use axum::Json;

pub async fn block(
    ctx: RequestContext,
    caller: Caller,
    Payload(args): Payload<TargetUidArgs>,
) -> ServiceResponse<SuccessResponse> {
    let target_uid = required_uid(args.target_uid)?;
    blocks::block(&ctx, &caller.uid, &target_uid).await?;
    Ok(Json(SuccessResponse::default()))
}

pub async fn unblock(
    ctx: RequestContext,
    caller: Caller,
    Payload(args): Payload<TargetUidArgs>,
) -> ServiceResponse<SuccessResponse> {
    let target_uid = required_uid(args.target_uid)?;
    blocks::unblock(&ctx, &caller.uid, &target_uid).await?;
    Ok(Json(SuccessResponse::default()))
}

pub async fn blocked(ctx: RequestContext, caller: Caller) -> ServiceResponse<UidsResponse> {
    let uids = blocks::fetch_blocked(&ctx, &caller.uid).await?;
    Ok(Json(UidsResponse { uids }))
}
