use crate::api::RequestContext;
use crate::common::axum_extract::Caller;
use crate::common::error::ServiceResponse;
use crate::models::callables::{CountersResponse, RelationshipStatusResponse};
use crate::usecases::relationships;
use axum::Json;
use axum::extract::Path;

pub async fn status(
    ctx: RequestContext,
    caller: Caller,
    Path(uid): Path<String>,
) -> ServiceResponse<RelationshipStatusResponse> {
    let status = relationships::fetch_status(&ctx, &caller.uid, &uid).await?;
    Ok(Json(RelationshipStatusResponse { uid, status }))
}

pub async fn counters(ctx: RequestContext, caller: Caller) -> ServiceResponse<CountersResponse> {
    let counters = relationships::fetch_counters(&ctx, &caller.uid).await?;
    Ok(Json(CountersResponse { counters }))
}
