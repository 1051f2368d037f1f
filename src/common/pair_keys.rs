//! Deterministic document ids for two-party relations.
//!
//! Directed relations (friend requests, blocks) keep argument order, so a
//! request and its reverse live in different documents. Undirected relations
//! (friendships) sort the pair first and resolve to the same document from
//! either side.

use crate::common::error::{AppError, ServiceResult};

pub const DIRECTED_SEPARATOR: &str = "_";
pub const UNDIRECTED_SEPARATOR: &str = "__";

const MAX_UID_LEN: usize = 128;

pub fn directed_key(from_uid: &str, to_uid: &str) -> String {
    format!("{from_uid}{DIRECTED_SEPARATOR}{to_uid}")
}

pub fn undirected_key(uid_a: &str, uid_b: &str) -> String {
    let (low, high) = sorted_pair(uid_a, uid_b);
    format!("{low}{UNDIRECTED_SEPARATOR}{high}")
}

pub fn sorted_pair<'a>(uid_a: &'a str, uid_b: &'a str) -> (&'a str, &'a str) {
    if uid_a <= uid_b {
        (uid_a, uid_b)
    } else {
        (uid_b, uid_a)
    }
}

/// Separators never appear inside a valid uid, which keeps both key forms injective.
pub fn is_valid_uid(uid: &str) -> bool {
    !uid.is_empty()
        && uid.len() <= MAX_UID_LEN
        && uid
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || byte == b'-')
}

pub fn validate_uid(uid: &str) -> ServiceResult<&str> {
    match is_valid_uid(uid) {
        true => Ok(uid),
        false => Err(AppError::UsersInvalidId),
    }
}

/// Validates both parties of a relation and rejects self-targeting.
pub fn validate_pair<'a>(actor_uid: &'a str, target_uid: &'a str) -> ServiceResult<(&'a str, &'a str)> {
    let actor_uid = validate_uid(actor_uid)?;
    let target_uid = validate_uid(target_uid)?;
    if actor_uid == target_uid {
        return Err(AppError::RelationshipsSelfTarget);
    }
    Ok((actor_uid, target_uid))
}
