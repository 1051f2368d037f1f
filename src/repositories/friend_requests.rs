use crate::common::pair_keys::directed_key;
use crate::common::store::{Document, DocumentPath, StoreResult, Transaction};
use crate::entities::friend_requests::{
    FROM_UID_FIELD, FriendRequest, STATUS_FIELD, TO_UID_FIELD, UPDATED_AT_FIELD,
};
use crate::models::friend_requests::FriendRequestStatus;
use chrono::Utc;

pub const COLLECTION: &str = "friend_requests";

fn make_path(from_uid: &str, to_uid: &str) -> DocumentPath {
    DocumentPath::new(COLLECTION, directed_key(from_uid, to_uid))
}

pub async fn fetch_one(
    tx: &mut Transaction,
    from_uid: &str,
    to_uid: &str,
) -> StoreResult<Option<FriendRequest>> {
    tx.get_as(&make_path(from_uid, to_uid)).await
}

pub async fn fetch_pending_by_sender(
    tx: &mut Transaction,
    from_uid: &str,
) -> StoreResult<Vec<FriendRequest>> {
    let requests: Vec<(String, FriendRequest)> =
        tx.query_as(COLLECTION, FROM_UID_FIELD, from_uid).await?;
    Ok(requests
        .into_iter()
        .map(|(_, request)| request)
        .filter(|request| request.status.is_pending())
        .collect())
}

pub async fn fetch_pending_by_recipient(
    tx: &mut Transaction,
    to_uid: &str,
) -> StoreResult<Vec<FriendRequest>> {
    let requests: Vec<(String, FriendRequest)> = tx.query_as(COLLECTION, TO_UID_FIELD, to_uid).await?;
    Ok(requests
        .into_iter()
        .map(|(_, request)| request)
        .filter(|request| request.status.is_pending())
        .collect())
}

/// Opens a PENDING request, replacing whatever terminal request held the key.
pub fn create(tx: &mut Transaction, from_uid: &str, to_uid: &str) -> StoreResult<()> {
    let now = Utc::now();
    let request = FriendRequest {
        from_uid: from_uid.to_owned(),
        to_uid: to_uid.to_owned(),
        status: FriendRequestStatus::Pending,
        created_at: now,
        updated_at: now,
    };
    tx.set(make_path(from_uid, to_uid), &request)
}

pub fn update_status(
    tx: &mut Transaction,
    from_uid: &str,
    to_uid: &str,
    status: FriendRequestStatus,
) -> StoreResult<()> {
    let mut fields = Document::new();
    fields.insert(STATUS_FIELD.to_owned(), serde_json::to_value(status)?);
    fields.insert(UPDATED_AT_FIELD.to_owned(), serde_json::to_value(Utc::now())?);
    tx.merge(make_path(from_uid, to_uid), fields);
    Ok(())
}
