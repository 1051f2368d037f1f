pub mod friend_categories;
pub mod friend_requests;

use crate::common::context::Context;
use crate::common::error::ServiceResult;
use crate::models::events::RelationshipEvent;
use tracing::debug;

pub async fn dispatch<C: Context>(ctx: &C, event: RelationshipEvent) -> ServiceResult<()> {
    match event {
        RelationshipEvent::RequestSent { from_uid, to_uid } => {
            friend_requests::handle_sent(ctx, &from_uid, &to_uid).await
        }
        RelationshipEvent::RequestAccepted { from_uid, to_uid } => {
            friend_requests::handle_accepted(ctx, &from_uid, &to_uid).await
        }
        RelationshipEvent::CategoryChanged { category_id } => {
            friend_categories::handle_changed(ctx, &category_id).await
        }
        event => {
            debug!(channel = event.channel(), "Ignoring relationship event");
            Ok(())
        }
    }
}
