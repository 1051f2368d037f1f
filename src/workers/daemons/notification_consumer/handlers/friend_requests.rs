use crate::common::context::Context;
use crate::common::error::ServiceResult;
use crate::usecases::notifications;
use tracing::info;

pub async fn handle_sent<C: Context>(ctx: &C, from_uid: &str, to_uid: &str) -> ServiceResult<()> {
    info!(from_uid, to_uid, "Handling friend request sent event");
    notifications::notify_friend_request(ctx, from_uid, to_uid).await?;
    Ok(())
}

pub async fn handle_accepted<C: Context>(
    ctx: &C,
    from_uid: &str,
    to_uid: &str,
) -> ServiceResult<()> {
    info!(from_uid, to_uid, "Handling friend request accepted event");
    notifications::notify_friend_accepted(ctx, from_uid, to_uid).await?;
    Ok(())
}
