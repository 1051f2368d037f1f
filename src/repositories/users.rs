use crate::common::store::{Document, DocumentPath, StoreResult, Transaction};
use crate::entities::users::{
    FRIENDS_COUNT_FIELD, INCOMING_COUNT_FIELD, OUTGOING_COUNT_FIELD, UPDATED_AT_FIELD, User,
};
use crate::models::counters::CounterLedger;
use chrono::Utc;

pub const COLLECTION: &str = "users";

fn make_path(uid: &str) -> DocumentPath {
    DocumentPath::new(COLLECTION, uid)
}

pub async fn fetch_one(tx: &mut Transaction, uid: &str) -> StoreResult<Option<User>> {
    tx.get_as(&make_path(uid)).await
}

/// The only writer of the relationship counters. Deltas are applied as
/// commutative increments, so the user documents are never read for it.
pub fn apply_counters(tx: &mut Transaction, ledger: &CounterLedger) -> StoreResult<()> {
    for (uid, delta) in ledger.entries() {
        tx.increment(make_path(uid), OUTGOING_COUNT_FIELD, delta.outgoing);
        tx.increment(make_path(uid), INCOMING_COUNT_FIELD, delta.incoming);
        tx.increment(make_path(uid), FRIENDS_COUNT_FIELD, delta.friends);

        let mut fields = Document::new();
        fields.insert(UPDATED_AT_FIELD.to_owned(), serde_json::to_value(Utc::now())?);
        tx.merge(make_path(uid), fields);
    }
    Ok(())
}
