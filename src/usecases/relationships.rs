use crate::common::context::Context;
use crate::common::error::ServiceResult;
use crate::common::pair_keys::{validate_pair, validate_uid};
use crate::common::store::Transaction;
use crate::models::counters::Counters;
use crate::models::relationships::RelationshipStatus;
use crate::repositories::{blocks, friend_requests, friendships, users};
use crate::usecases::transactions::{self, Transition};
use async_trait::async_trait;

struct FetchStatus<'a> {
    uid: &'a str,
    other_uid: &'a str,
}

#[async_trait]
impl<'a> Transition for FetchStatus<'a> {
    type Output = RelationshipStatus;

    const NAME: &'static str = "fetch_relationship_status";

    async fn apply(&self, tx: &mut Transaction) -> ServiceResult<RelationshipStatus> {
        let (uid, other_uid) = (self.uid, self.other_uid);
        let block = blocks::fetch_one(tx, uid, other_uid).await?;
        let reverse_block = blocks::fetch_one(tx, other_uid, uid).await?;
        let friendship = friendships::fetch_one(tx, uid, other_uid).await?;
        let outgoing = friend_requests::fetch_one(tx, uid, other_uid).await?;
        let incoming = friend_requests::fetch_one(tx, other_uid, uid).await?;

        // blocks take precedence, an implicit mirror means the other side blocked
        if let Some(block) = block {
            return Ok(match block.is_implicit {
                true => RelationshipStatus::BlockedByOther,
                false => RelationshipStatus::BlockedByMe,
            });
        }
        if reverse_block.is_some() {
            return Ok(RelationshipStatus::BlockedByOther);
        }
        if friendship.is_some() {
            return Ok(RelationshipStatus::Friends);
        }
        if outgoing.is_some_and(|request| request.status.is_pending()) {
            return Ok(RelationshipStatus::PendingOut);
        }
        if incoming.is_some_and(|request| request.status.is_pending()) {
            return Ok(RelationshipStatus::PendingIn);
        }
        Ok(RelationshipStatus::None)
    }
}

/// How `uid` currently relates to `other_uid`.
pub async fn fetch_status<C: Context>(
    ctx: &C,
    uid: &str,
    other_uid: &str,
) -> ServiceResult<RelationshipStatus> {
    let (uid, other_uid) = validate_pair(uid, other_uid)?;
    transactions::run(ctx, &FetchStatus { uid, other_uid }).await
}

struct FetchCounters<'a> {
    uid: &'a str,
}

#[async_trait]
impl<'a> Transition for FetchCounters<'a> {
    type Output = Counters;

    const NAME: &'static str = "fetch_counters";

    async fn apply(&self, tx: &mut Transaction) -> ServiceResult<Counters> {
        let counters = match users::fetch_one(tx, self.uid).await? {
            Some(user) => Counters {
                outgoing_count: user.outgoing_count,
                incoming_count: user.incoming_count,
                friends_count: user.friends_count,
            },
            None => Counters::default(),
        };
        Ok(counters)
    }
}

pub async fn fetch_counters<C: Context>(ctx: &C, uid: &str) -> ServiceResult<Counters> {
    let uid = validate_uid(uid)?;
    transactions::run(ctx, &FetchCounters { uid }).await
}
