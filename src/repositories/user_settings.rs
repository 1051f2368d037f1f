use crate::common::store::{DocumentPath, StoreResult, Transaction};
use crate::entities::user_settings::UserSettings;

pub const COLLECTION: &str = "user_settings";

pub async fn fetch_one(tx: &mut Transaction, uid: &str) -> StoreResult<Option<UserSettings>> {
    tx.get_as(&DocumentPath::new(COLLECTION, uid)).await
}
