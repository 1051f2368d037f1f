use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult};
use crate::common::events;
use crate::common::pair_keys::{validate_pair, validate_uid};
use crate::common::store::Transaction;
use crate::entities::friend_categories::FriendCategory;
use crate::models::counters::CounterLedger;
use crate::models::events::RelationshipEvent;
use crate::models::friend_requests::FriendRequestStatus;
use crate::repositories::{blocks, friend_categories, friend_requests, friendships, users};
use crate::usecases::transactions::{self, Transition};
use async_trait::async_trait;
use tracing::info;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BlockOutcome {
    pub removed_friendship: bool,
    pub canceled_requests: usize,
    pub updated_categories: usize,
}

/// Categories among `categories` listing `uid`, with `uid` removed.
fn strip_member(
    categories: Vec<(String, FriendCategory)>,
    uid: &str,
) -> Vec<(String, Vec<String>)> {
    categories
        .into_iter()
        .filter(|(_, category)| category.friend_ids.iter().any(|id| id == uid))
        .map(|(category_id, category)| {
            let friend_ids = category
                .friend_ids
                .into_iter()
                .filter(|id| id != uid)
                .collect();
            (category_id, friend_ids)
        })
        .collect()
}

struct Block<'a> {
    blocker_uid: &'a str,
    target_uid: &'a str,
}

#[async_trait]
impl<'a> Transition for Block<'a> {
    type Output = BlockOutcome;

    const NAME: &'static str = "block_user";

    async fn apply(&self, tx: &mut Transaction) -> ServiceResult<BlockOutcome> {
        let (blocker_uid, target_uid) = (self.blocker_uid, self.target_uid);
        let reverse_block = blocks::fetch_one(tx, target_uid, blocker_uid).await?;
        let friendship = friendships::fetch_one(tx, blocker_uid, target_uid).await?;
        let request = friend_requests::fetch_one(tx, blocker_uid, target_uid).await?;
        let reverse_request = friend_requests::fetch_one(tx, target_uid, blocker_uid).await?;
        let blocker_categories = friend_categories::fetch_by_owner(tx, blocker_uid).await?;
        let target_categories = friend_categories::fetch_by_owner(tx, target_uid).await?;

        let mut outcome = BlockOutcome::default();
        let mut ledger = CounterLedger::default();

        blocks::create(tx, blocker_uid, target_uid, false)?;
        // an explicit block issued by the target stays explicit
        if reverse_block.is_none_or(|block| block.is_implicit) {
            blocks::create(tx, target_uid, blocker_uid, true)?;
        }

        if friendship.is_some() {
            friendships::delete(tx, blocker_uid, target_uid);
            ledger.friendship_removed(blocker_uid, target_uid);
            outcome.removed_friendship = true;
        }

        if request.is_some_and(|request| request.status.is_pending()) {
            friend_requests::update_status(
                tx,
                blocker_uid,
                target_uid,
                FriendRequestStatus::Canceled,
            )?;
            ledger.request_closed(blocker_uid, target_uid);
            outcome.canceled_requests += 1;
        }
        if reverse_request.is_some_and(|request| request.status.is_pending()) {
            friend_requests::update_status(
                tx,
                target_uid,
                blocker_uid,
                FriendRequestStatus::Canceled,
            )?;
            ledger.request_closed(target_uid, blocker_uid);
            outcome.canceled_requests += 1;
        }

        let stripped = strip_member(blocker_categories, target_uid)
            .into_iter()
            .chain(strip_member(target_categories, blocker_uid));
        for (category_id, friend_ids) in stripped {
            friend_categories::update_friend_ids(tx, &category_id, &friend_ids)?;
            outcome.updated_categories += 1;
        }

        users::apply_counters(tx, &ledger)?;
        Ok(outcome)
    }
}

struct Unblock<'a> {
    blocker_uid: &'a str,
    target_uid: &'a str,
}

#[async_trait]
impl<'a> Transition for Unblock<'a> {
    type Output = ();

    const NAME: &'static str = "unblock_user";

    async fn apply(&self, tx: &mut Transaction) -> ServiceResult<()> {
        let (blocker_uid, target_uid) = (self.blocker_uid, self.target_uid);
        let block = blocks::fetch_one(tx, blocker_uid, target_uid).await?;
        let reverse_block = blocks::fetch_one(tx, target_uid, blocker_uid).await?;

        // only the party that issued a block may lift it
        if block.is_none_or(|block| block.is_implicit) {
            return Err(AppError::BlocksNotFound);
        }

        match reverse_block {
            Some(reverse_block) if !reverse_block.is_implicit => {
                // the target still blocks the caller, keep mirroring that
                blocks::create(tx, blocker_uid, target_uid, true)?;
            }
            _ => {
                blocks::delete(tx, blocker_uid, target_uid);
                blocks::delete(tx, target_uid, blocker_uid);
            }
        }
        Ok(())
    }
}

pub async fn block<C: Context>(
    ctx: &C,
    blocker_uid: &str,
    target_uid: &str,
) -> ServiceResult<BlockOutcome> {
    let (blocker_uid, target_uid) = validate_pair(blocker_uid, target_uid)?;
    let outcome = transactions::run(ctx, &Block {
        blocker_uid,
        target_uid,
    })
    .await?;
    info!(
        blocker_uid,
        target_uid,
        removed_friendship = outcome.removed_friendship,
        canceled_requests = outcome.canceled_requests,
        updated_categories = outcome.updated_categories,
        "User blocked"
    );
    events::publish(
        ctx,
        RelationshipEvent::Blocked {
            blocker_uid: blocker_uid.to_owned(),
            blocked_uid: target_uid.to_owned(),
        },
    )
    .await;
    Ok(outcome)
}

pub async fn unblock<C: Context>(ctx: &C, blocker_uid: &str, target_uid: &str) -> ServiceResult<()> {
    let blocker_uid = validate_uid(blocker_uid)?;
    let target_uid = validate_uid(target_uid)?;
    transactions::run(ctx, &Unblock {
        blocker_uid,
        target_uid,
    })
    .await?;
    info!(blocker_uid, target_uid, "User unblocked");
    events::publish(
        ctx,
        RelationshipEvent::Unblocked {
            blocker_uid: blocker_uid.to_owned(),
            blocked_uid: target_uid.to_owned(),
        },
    )
    .await;
    Ok(())
}

struct ListBlocked<'a> {
    uid: &'a str,
}

#[async_trait]
impl<'a> Transition for ListBlocked<'a> {
    type Output = Vec<String>;

    const NAME: &'static str = "list_blocked";

    async fn apply(&self, tx: &mut Transaction) -> ServiceResult<Vec<String>> {
        let blocks = blocks::fetch_by_blocker(tx, self.uid).await?;
        let mut blocked_uids: Vec<String> = blocks
            .into_iter()
            .filter(|block| !block.is_implicit)
            .map(|block| block.blocked)
            .collect();
        blocked_uids.sort();
        Ok(blocked_uids)
    }
}

/// Users `uid` has explicitly blocked.
pub async fn fetch_blocked<C: Context>(ctx: &C, uid: &str) -> ServiceResult<Vec<String>> {
    let uid = validate_uid(uid)?;
    transactions::run(ctx, &ListBlocked { uid }).await
}
