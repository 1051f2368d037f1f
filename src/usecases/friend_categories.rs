use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult};
use crate::common::events;
use crate::common::pair_keys::{is_valid_uid, validate_uid};
use crate::common::store::Transaction;
use crate::entities::friend_categories::FriendCategory as FriendCategoryEntity;
use crate::models::events::RelationshipEvent;
use crate::models::friend_categories::FriendCategory;
use crate::repositories::{blocks, friend_categories};
use crate::usecases::transactions::{self, Transition};
use async_trait::async_trait;
use chrono::Utc;
use hashbrown::HashSet;
use tracing::info;
use uuid::Uuid;

/// Every uid `uid` has a block record towards, implicit mirrors included,
/// which covers blocks issued in either direction.
async fn fetch_blocked_either_way(tx: &mut Transaction, uid: &str) -> ServiceResult<HashSet<String>> {
    let blocks = blocks::fetch_by_blocker(tx, uid).await?;
    Ok(blocks.into_iter().map(|block| block.blocked).collect())
}

fn validate_friend_ids(friend_ids: Vec<String>) -> ServiceResult<Vec<String>> {
    let mut seen = HashSet::with_capacity(friend_ids.len());
    let mut unique_ids = Vec::with_capacity(friend_ids.len());
    for friend_id in friend_ids {
        validate_uid(&friend_id)?;
        if seen.insert(friend_id.clone()) {
            unique_ids.push(friend_id);
        }
    }
    Ok(unique_ids)
}

struct SaveCategory<'a> {
    owner_uid: &'a str,
    category_id: &'a str,
    is_new: bool,
    name: &'a str,
    friend_ids: &'a [String],
}

#[async_trait]
impl<'a> Transition for SaveCategory<'a> {
    type Output = FriendCategory;

    const NAME: &'static str = "save_friend_category";

    async fn apply(&self, tx: &mut Transaction) -> ServiceResult<FriendCategory> {
        let existing = match self.is_new {
            true => None,
            false => friend_categories::fetch_one(tx, self.category_id).await?,
        };
        let blocked = fetch_blocked_either_way(tx, self.owner_uid).await?;

        if existing
            .as_ref()
            .is_some_and(|category| category.user_id != self.owner_uid)
        {
            return Err(AppError::FriendCategoriesNotOwner);
        }

        let now = Utc::now();
        let category = FriendCategoryEntity {
            user_id: self.owner_uid.to_owned(),
            name: self.name.to_owned(),
            friend_ids: self
                .friend_ids
                .iter()
                .filter(|friend_id| !blocked.contains(friend_id.as_str()))
                .cloned()
                .collect(),
            created_at: existing
                .and_then(|category| category.created_at)
                .or(Some(now)),
            updated_at: Some(now),
        };
        friend_categories::save(tx, self.category_id, &category)?;
        Ok(FriendCategory::from_entity(
            self.category_id.to_owned(),
            category,
        ))
    }
}

/// Creates a category, or replaces one `owner_uid` already owns. Blocked
/// users are dropped from `friend_ids` before writing.
pub async fn save<C: Context>(
    ctx: &C,
    owner_uid: &str,
    category_id: Option<&str>,
    name: &str,
    friend_ids: Vec<String>,
) -> ServiceResult<FriendCategory> {
    let owner_uid = validate_uid(owner_uid)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::FriendCategoriesInvalidName);
    }
    let friend_ids = validate_friend_ids(friend_ids)?;

    let (category_id, is_new) = match category_id {
        Some(category_id) if is_valid_uid(category_id) => (category_id.to_owned(), false),
        Some(_) => return Err(AppError::FriendCategoriesNotFound),
        None => (Uuid::new_v4().to_string(), true),
    };

    let transition = SaveCategory {
        owner_uid,
        category_id: &category_id,
        is_new,
        name,
        friend_ids: &friend_ids,
    };
    let category = transactions::run(ctx, &transition).await?;
    info!(
        owner_uid,
        category_id,
        friend_count = category.friend_ids.len(),
        "Friend category saved"
    );
    events::publish(ctx, RelationshipEvent::CategoryChanged { category_id }).await;
    Ok(category)
}

struct DeleteCategory<'a> {
    owner_uid: &'a str,
    category_id: &'a str,
}

#[async_trait]
impl<'a> Transition for DeleteCategory<'a> {
    type Output = ();

    const NAME: &'static str = "delete_friend_category";

    async fn apply(&self, tx: &mut Transaction) -> ServiceResult<()> {
        let Some(category) = friend_categories::fetch_one(tx, self.category_id).await? else {
            return Err(AppError::FriendCategoriesNotFound);
        };
        if category.user_id != self.owner_uid {
            return Err(AppError::FriendCategoriesNotOwner);
        }
        friend_categories::delete(tx, self.category_id);
        Ok(())
    }
}

pub async fn delete<C: Context>(ctx: &C, owner_uid: &str, category_id: &str) -> ServiceResult<()> {
    let owner_uid = validate_uid(owner_uid)?;
    if !is_valid_uid(category_id) {
        return Err(AppError::FriendCategoriesNotFound);
    }
    transactions::run(ctx, &DeleteCategory {
        owner_uid,
        category_id,
    })
    .await?;
    info!(owner_uid, category_id, "Friend category deleted");
    Ok(())
}

struct SyncCategory<'a> {
    category_id: &'a str,
}

#[async_trait]
impl<'a> Transition for SyncCategory<'a> {
    type Output = usize;

    const NAME: &'static str = "sync_friend_category";

    async fn apply(&self, tx: &mut Transaction) -> ServiceResult<usize> {
        let Some(category) = friend_categories::fetch_one(tx, self.category_id).await? else {
            return Err(AppError::FriendCategoriesNotFound);
        };
        let blocked = fetch_blocked_either_way(tx, &category.user_id).await?;

        let total = category.friend_ids.len();
        let friend_ids: Vec<String> = category
            .friend_ids
            .into_iter()
            .filter(|friend_id| !blocked.contains(friend_id.as_str()))
            .collect();
        let removed = total - friend_ids.len();
        if removed > 0 {
            friend_categories::update_friend_ids(tx, self.category_id, &friend_ids)?;
        }
        Ok(removed)
    }
}

/// Strips blocked users from a category edited outside of `save`.
/// Returns how many uids were removed.
pub async fn sync<C: Context>(ctx: &C, category_id: &str) -> ServiceResult<usize> {
    if !is_valid_uid(category_id) {
        return Err(AppError::FriendCategoriesNotFound);
    }
    let removed = transactions::run(ctx, &SyncCategory { category_id }).await?;
    if removed > 0 {
        info!(category_id, removed, "Removed blocked users from friend category");
    }
    Ok(removed)
}
