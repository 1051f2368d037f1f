use crate::common::pair_keys::directed_key;
use crate::common::store::{DocumentPath, StoreResult, Transaction};
use crate::entities::blocks::{BLOCKER_FIELD, Block};
use chrono::Utc;

pub const COLLECTION: &str = "blocks";

fn make_path(blocker_uid: &str, blocked_uid: &str) -> DocumentPath {
    DocumentPath::new(COLLECTION, directed_key(blocker_uid, blocked_uid))
}

pub async fn fetch_one(
    tx: &mut Transaction,
    blocker_uid: &str,
    blocked_uid: &str,
) -> StoreResult<Option<Block>> {
    tx.get_as(&make_path(blocker_uid, blocked_uid)).await
}

/// Every block record keyed from `uid`, implicit mirrors included.
pub async fn fetch_by_blocker(tx: &mut Transaction, uid: &str) -> StoreResult<Vec<Block>> {
    let blocks: Vec<(String, Block)> = tx.query_as(COLLECTION, BLOCKER_FIELD, uid).await?;
    Ok(blocks.into_iter().map(|(_, block)| block).collect())
}

pub fn create(
    tx: &mut Transaction,
    blocker_uid: &str,
    blocked_uid: &str,
    is_implicit: bool,
) -> StoreResult<()> {
    let block = Block {
        blocker: blocker_uid.to_owned(),
        blocked: blocked_uid.to_owned(),
        is_implicit,
        mutual_block: true,
        created_at: Utc::now(),
    };
    tx.set(make_path(blocker_uid, blocked_uid), &block)
}

pub fn delete(tx: &mut Transaction, blocker_uid: &str, blocked_uid: &str) {
    tx.delete(make_path(blocker_uid, blocked_uid));
}
