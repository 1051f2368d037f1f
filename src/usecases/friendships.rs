use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult};
use crate::common::events;
use crate::common::pair_keys::{validate_pair, validate_uid};
use crate::common::store::Transaction;
use crate::models::counters::CounterLedger;
use crate::models::events::RelationshipEvent;
use crate::repositories::{friendships, users};
use crate::usecases::transactions::{self, Transition};
use async_trait::async_trait;
use tracing::info;

struct Unfriend<'a> {
    uid: &'a str,
    other_uid: &'a str,
}

#[async_trait]
impl<'a> Transition for Unfriend<'a> {
    type Output = ();

    const NAME: &'static str = "unfriend";

    async fn apply(&self, tx: &mut Transaction) -> ServiceResult<()> {
        let friendship = friendships::fetch_one(tx, self.uid, self.other_uid).await?;
        if friendship.is_none() {
            return Err(AppError::FriendshipsNotFound);
        }

        friendships::delete(tx, self.uid, self.other_uid);
        let mut ledger = CounterLedger::default();
        ledger.friendship_removed(self.uid, self.other_uid);
        users::apply_counters(tx, &ledger)?;
        Ok(())
    }
}

pub async fn unfriend<C: Context>(ctx: &C, uid: &str, other_uid: &str) -> ServiceResult<()> {
    let (uid, other_uid) = validate_pair(uid, other_uid)?;
    transactions::run(ctx, &Unfriend { uid, other_uid }).await?;
    info!(uid, other_uid, "Friendship removed");
    events::publish(
        ctx,
        RelationshipEvent::Unfriended {
            uid: uid.to_owned(),
            other_uid: other_uid.to_owned(),
        },
    )
    .await;
    Ok(())
}

struct ListFriends<'a> {
    uid: &'a str,
}

#[async_trait]
impl<'a> Transition for ListFriends<'a> {
    type Output = Vec<String>;

    const NAME: &'static str = "list_friends";

    async fn apply(&self, tx: &mut Transaction) -> ServiceResult<Vec<String>> {
        let friendships = friendships::fetch_by_member(tx, self.uid).await?;
        let mut friend_uids: Vec<String> = friendships
            .into_iter()
            .filter_map(|friendship| friendship.uids.into_iter().find(|uid| uid != self.uid))
            .collect();
        friend_uids.sort();
        Ok(friend_uids)
    }
}

pub async fn fetch_friends<C: Context>(ctx: &C, uid: &str) -> ServiceResult<Vec<String>> {
    let uid = validate_uid(uid)?;
    transactions::run(ctx, &ListFriends { uid }).await
}
