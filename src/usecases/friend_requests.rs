use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult};
use crate::common::events;
use crate::common::pair_keys::{validate_pair, validate_uid};
use crate::common::store::Transaction;
use crate::models::counters::CounterLedger;
use crate::models::events::RelationshipEvent;
use crate::models::friend_requests::{FriendRequest, FriendRequestStatus};
use crate::repositories::{blocks, friend_requests, friendships, users};
use crate::usecases::transactions::{self, Transition};
use async_trait::async_trait;
use tracing::info;

struct SendRequest<'a> {
    from_uid: &'a str,
    to_uid: &'a str,
}

#[async_trait]
impl<'a> Transition for SendRequest<'a> {
    type Output = ();

    const NAME: &'static str = "send_friend_request";

    async fn apply(&self, tx: &mut Transaction) -> ServiceResult<()> {
        let (from_uid, to_uid) = (self.from_uid, self.to_uid);
        let request = friend_requests::fetch_one(tx, from_uid, to_uid).await?;
        let block = blocks::fetch_one(tx, from_uid, to_uid).await?;
        let reverse_block = blocks::fetch_one(tx, to_uid, from_uid).await?;
        let friendship = friendships::fetch_one(tx, from_uid, to_uid).await?;

        if request.is_some_and(|request| request.status.is_pending()) {
            return Err(AppError::FriendRequestsAlreadyPending);
        }
        if block.is_some() || reverse_block.is_some() {
            return Err(AppError::InteractionBlocked);
        }
        if friendship.is_some() {
            return Err(AppError::RelationshipsAlreadyFriends);
        }

        friend_requests::create(tx, from_uid, to_uid)?;
        let mut ledger = CounterLedger::default();
        ledger.request_opened(from_uid, to_uid);
        users::apply_counters(tx, &ledger)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    Cancel,
    Accept,
    Reject,
}

impl Resolution {
    const fn status(&self) -> FriendRequestStatus {
        match self {
            Resolution::Cancel => FriendRequestStatus::Canceled,
            Resolution::Accept => FriendRequestStatus::Accepted,
            Resolution::Reject => FriendRequestStatus::Rejected,
        }
    }
}

/// Moves a PENDING request into one of its terminal states.
struct ResolveRequest<'a> {
    caller_uid: &'a str,
    from_uid: &'a str,
    to_uid: &'a str,
    resolution: Resolution,
}

#[async_trait]
impl<'a> Transition for ResolveRequest<'a> {
    type Output = ();

    const NAME: &'static str = "resolve_friend_request";

    async fn apply(&self, tx: &mut Transaction) -> ServiceResult<()> {
        let (from_uid, to_uid) = (self.from_uid, self.to_uid);
        let request = friend_requests::fetch_one(tx, from_uid, to_uid).await?;
        let friendship = match self.resolution {
            Resolution::Accept => friendships::fetch_one(tx, from_uid, to_uid).await?,
            Resolution::Cancel | Resolution::Reject => None,
        };

        let Some(request) = request else {
            return Err(AppError::FriendRequestsNotFound);
        };
        if !request.status.is_pending() {
            return Err(AppError::FriendRequestsNotPending);
        }
        match self.resolution {
            Resolution::Cancel if request.from_uid != self.caller_uid => {
                return Err(AppError::FriendRequestsNotSender);
            }
            Resolution::Accept | Resolution::Reject if request.to_uid != self.caller_uid => {
                return Err(AppError::FriendRequestsNotRecipient);
            }
            _ => {}
        }
        // a crossed request accepted first already made them friends
        if friendship.is_some() {
            return Err(AppError::RelationshipsAlreadyFriends);
        }

        friend_requests::update_status(tx, from_uid, to_uid, self.resolution.status())?;
        let mut ledger = CounterLedger::default();
        ledger.request_closed(from_uid, to_uid);
        if self.resolution == Resolution::Accept {
            friendships::create(tx, from_uid, to_uid)?;
            ledger.friendship_created(from_uid, to_uid);
        }
        users::apply_counters(tx, &ledger)?;
        Ok(())
    }
}

pub async fn send<C: Context>(ctx: &C, from_uid: &str, to_uid: &str) -> ServiceResult<()> {
    let (from_uid, to_uid) = validate_pair(from_uid, to_uid)?;
    transactions::run(ctx, &SendRequest { from_uid, to_uid }).await?;
    info!(from_uid, to_uid, "Friend request sent");
    events::publish(
        ctx,
        RelationshipEvent::RequestSent {
            from_uid: from_uid.to_owned(),
            to_uid: to_uid.to_owned(),
        },
    )
    .await;
    Ok(())
}

async fn resolve<C: Context>(
    ctx: &C,
    caller_uid: &str,
    from_uid: &str,
    to_uid: &str,
    resolution: Resolution,
) -> ServiceResult<()> {
    let from_uid = validate_uid(from_uid)?;
    let to_uid = validate_uid(to_uid)?;
    let transition = ResolveRequest {
        caller_uid,
        from_uid,
        to_uid,
        resolution,
    };
    transactions::run(ctx, &transition).await?;
    info!(
        from_uid,
        to_uid,
        status = resolution.status().as_str(),
        "Friend request resolved"
    );
    Ok(())
}

/// Called by the sender of the request.
pub async fn cancel<C: Context>(ctx: &C, from_uid: &str, to_uid: &str) -> ServiceResult<()> {
    resolve(ctx, from_uid, from_uid, to_uid, Resolution::Cancel).await?;
    events::publish(
        ctx,
        RelationshipEvent::RequestCanceled {
            from_uid: from_uid.to_owned(),
            to_uid: to_uid.to_owned(),
        },
    )
    .await;
    Ok(())
}

/// Called by the recipient of the request.
pub async fn accept<C: Context>(ctx: &C, to_uid: &str, from_uid: &str) -> ServiceResult<()> {
    resolve(ctx, to_uid, from_uid, to_uid, Resolution::Accept).await?;
    events::publish(
        ctx,
        RelationshipEvent::RequestAccepted {
            from_uid: from_uid.to_owned(),
            to_uid: to_uid.to_owned(),
        },
    )
    .await;
    Ok(())
}

/// Called by the recipient of the request.
pub async fn reject<C: Context>(ctx: &C, to_uid: &str, from_uid: &str) -> ServiceResult<()> {
    resolve(ctx, to_uid, from_uid, to_uid, Resolution::Reject).await?;
    events::publish(
        ctx,
        RelationshipEvent::RequestRejected {
            from_uid: from_uid.to_owned(),
            to_uid: to_uid.to_owned(),
        },
    )
    .await;
    Ok(())
}

struct ListPending<'a> {
    uid: &'a str,
    incoming: bool,
}

#[async_trait]
impl<'a> Transition for ListPending<'a> {
    type Output = Vec<FriendRequest>;

    const NAME: &'static str = "list_friend_requests";

    async fn apply(&self, tx: &mut Transaction) -> ServiceResult<Vec<FriendRequest>> {
        let requests = match self.incoming {
            true => friend_requests::fetch_pending_by_recipient(tx, self.uid).await?,
            false => friend_requests::fetch_pending_by_sender(tx, self.uid).await?,
        };
        Ok(requests.into_iter().map(FriendRequest::from).collect())
    }
}

pub async fn fetch_incoming<C: Context>(ctx: &C, uid: &str) -> ServiceResult<Vec<FriendRequest>> {
    let uid = validate_uid(uid)?;
    transactions::run(ctx, &ListPending {
        uid,
        incoming: true,
    })
    .await
}

pub async fn fetch_outgoing<C: Context>(ctx: &C, uid: &str) -> ServiceResult<Vec<FriendRequest>> {
    let uid = validate_uid(uid)?;
    transactions::run(ctx, &ListPending {
        uid,
        incoming: false,
    })
    .await
}
