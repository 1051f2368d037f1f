use crate::common::store::{Document, DocumentPath, StoreResult, Transaction};
use crate::entities::friend_categories::{
    FRIEND_IDS_FIELD, FriendCategory, UPDATED_AT_FIELD, USER_ID_FIELD,
};
use chrono::Utc;

pub const COLLECTION: &str = "friend_categories";

fn make_path(category_id: &str) -> DocumentPath {
    DocumentPath::new(COLLECTION, category_id)
}

pub async fn fetch_one(
    tx: &mut Transaction,
    category_id: &str,
) -> StoreResult<Option<FriendCategory>> {
    tx.get_as(&make_path(category_id)).await
}

pub async fn fetch_by_owner(
    tx: &mut Transaction,
    user_id: &str,
) -> StoreResult<Vec<(String, FriendCategory)>> {
    tx.query_as(COLLECTION, USER_ID_FIELD, user_id).await
}

pub fn save(tx: &mut Transaction, category_id: &str, category: &FriendCategory) -> StoreResult<()> {
    tx.set(make_path(category_id), category)
}

pub fn update_friend_ids(
    tx: &mut Transaction,
    category_id: &str,
    friend_ids: &[String],
) -> StoreResult<()> {
    let mut fields = Document::new();
    fields.insert(FRIEND_IDS_FIELD.to_owned(), serde_json::to_value(friend_ids)?);
    fields.insert(UPDATED_AT_FIELD.to_owned(), serde_json::to_value(Utc::now())?);
    tx.merge(make_path(category_id), fields);
    Ok(())
}

pub fn delete(tx: &mut Transaction, category_id: &str) {
    tx.delete(make_path(category_id));
}
