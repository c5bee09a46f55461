//! Member documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{MemberId, ShardId};

/// A loyalty-program member.
///
/// Owned by exactly one shard, chosen by hashing the email's domain. Phone and
/// email are unique within that shard only; two shards could in principle hold
/// the same phone, a known limitation of the email-based placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub phone: String,
    pub email: String,
    /// Accumulated loyalty points, credited on each completed sale.
    pub points: u64,
    pub joined_at: DateTime<Utc>,
}

/// A member lookup result carrying the shard the member lives on.
///
/// The shard id is required later when a sale credits loyalty points.
#[derive(Debug, Clone)]
pub struct MemberHit {
    pub member: Member,
    pub shard_id: ShardId,
}

/// A member reference handed to the sale coordinator: the member's id plus the
/// shard it was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRef {
    pub member_id: MemberId,
    pub shard_id: ShardId,
}
