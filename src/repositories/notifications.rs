use crate::common::store::{DocumentPath, StoreResult, Transaction};
use crate::entities::notifications::Notification;
use uuid::Uuid;

pub const COLLECTION: &str = "notifications";

pub fn create(tx: &mut Transaction, notification: &Notification) -> StoreResult<Uuid> {
    let notification_id = Uuid::new_v4();
    tx.set(
        DocumentPath::new(COLLECTION, notification_id.to_string()),
        notification,
    )?;
    Ok(notification_id)
}
