use crate::common::pair_keys::undirected_key;
use crate::common::store::{DocumentPath, StoreResult, Transaction};
use crate::entities::friendships::{Friendship, UIDS_FIELD};
use chrono::Utc;

pub const COLLECTION: &str = "friendships";

fn make_path(uid_a: &str, uid_b: &str) -> DocumentPath {
    DocumentPath::new(COLLECTION, undirected_key(uid_a, uid_b))
}

pub async fn fetch_one(
    tx: &mut Transaction,
    uid_a: &str,
    uid_b: &str,
) -> StoreResult<Option<Friendship>> {
    tx.get_as(&make_path(uid_a, uid_b)).await
}

pub async fn fetch_by_member(tx: &mut Transaction, uid: &str) -> StoreResult<Vec<Friendship>> {
    let friendships: Vec<(String, Friendship)> = tx.query_as(COLLECTION, UIDS_FIELD, uid).await?;
    Ok(friendships
        .into_iter()
        .map(|(_, friendship)| friendship)
        .collect())
}

pub fn create(tx: &mut Transaction, requester_uid: &str, accepter_uid: &str) -> StoreResult<()> {
    let friendship = Friendship {
        uids: vec![requester_uid.to_owned(), accepter_uid.to_owned()],
        created_at: Utc::now(),
    };
    tx.set(make_path(requester_uid, accepter_uid), &friendship)
}

pub fn delete(tx: &mut Transaction, uid_a: &str, uid_b: &str) {
    tx.delete(make_path(uid_a, uid_b));
}
