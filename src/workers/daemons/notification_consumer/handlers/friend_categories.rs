use crate::common::context::Context;
use crate::common::error::ServiceResult;
use crate::usecases::friend_categories;
use tracing::info;

pub async fn handle_changed<C: Context>(ctx: &C, category_id: &str) -> ServiceResult<()> {
    info!(category_id, "Handling friend category changed event");
    let removed = friend_categories::sync(ctx, category_id).await?;
    info!(
        category_id,
        removed, "Successfully handled friend category changed event"
    );
    Ok(())
}
