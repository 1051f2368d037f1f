use crate::api::RequestContext;
use crate::common::axum_extract::{Caller, Payload};
use crate::common::error::ServiceResponse;
use crate::models::callables::{FriendCategoryResponse, SaveFriendCategoryArgs, SuccessResponse};
use crate::usecases::friend_categories;
use axum::Json;
use axum::extract::Path;

pub async fn save(
    ctx: RequestContext,
    caller: Caller,
    Payload(args): Payload<SaveFriendCategoryArgs>,
) -> ServiceResponse<FriendCategoryResponse> {
    let name = args.name.unwrap_or_default();
    let category = friend_categories::save(
        &ctx,
        &caller.uid,
        args.category_id.as_deref(),
        &name,
        args.friend_ids,
    )
    .await?;
    Ok(Json(FriendCategoryResponse { category }))
}

pub async fn delete(
    ctx: RequestContext,
    caller: Caller,
    Path(category_id): Path<String>,
) -> ServiceResponse<SuccessResponse> {
    friend_categories::delete(&ctx, &caller.uid, &category_id).await?;
    Ok(Json(SuccessResponse::default()))
}
