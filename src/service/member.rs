//! Member directory: add and find members across shards.
//!
//! Members are placed by email domain, so email lookups go straight to one
//! shard while phone lookups scatter across all of them.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::{Member, MemberHit, MemberId};
use crate::error::{DuplicateError, NotFoundError, Result};
use crate::routing::ShardRouter;
use crate::store::{MemberConflict, MemoryCluster};

#[derive(Clone)]
pub struct MemberDirectory {
    cluster: Arc<MemoryCluster>,
    router: ShardRouter,
}

impl MemberDirectory {
    pub fn new(cluster: Arc<MemoryCluster>, router: ShardRouter) -> Self {
        Self { cluster, router }
    }

    /// Register a member on the shard their email routes to, starting with
    /// zero loyalty points. Phone and email must be unique on that shard.
    pub fn add_member(&self, name: &str, phone: &str, email: &str) -> Result<MemberId> {
        let shard_id = self.router.shard_for_email(email);
        let shard = self.cluster.shard(shard_id)?;

        let member = Member {
            id: MemberId::generate(),
            name: name.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
            points: 0,
            joined_at: Utc::now(),
        };
        let member_id = member.id;

        shard.insert_member(member).map_err(|conflict| match conflict {
            MemberConflict::Email => DuplicateError::MemberEmail {
                email: email.to_string(),
                shard: shard_id,
            },
            MemberConflict::Phone => DuplicateError::MemberPhone {
                phone: phone.to_string(),
                shard: shard_id,
            },
        })?;

        info!(%member_id, shard = %shard_id, "added member");
        Ok(member_id)
    }

    /// Scatter lookup by phone: probe shards in shard order and return the
    /// first hit together with its shard id (needed later for loyalty
    /// updates). A phone alone does not identify the shard.
    ///
    /// An unreachable shard aborts the lookup; returning not-found while a
    /// shard that might hold the member is dark would be wrong.
    pub fn find_by_phone(&self, phone: &str) -> Result<MemberHit> {
        for shard_id in self.router.all() {
            let shard = self.cluster.shard(shard_id)?;
            if let Some(member) = shard.find_member_by_phone(phone) {
                return Ok(MemberHit { member, shard_id });
            }
        }
        Err(NotFoundError::MemberByPhone {
            phone: phone.to_string(),
        }
        .into())
    }

    /// Direct lookup by email on the one shard the email routes to.
    pub fn find_by_email(&self, email: &str) -> Result<Member> {
        let shard_id = self.router.shard_for_email(email);
        let shard = self.cluster.shard(shard_id)?;
        shard
            .find_member_by_email(email)
            .ok_or_else(|| {
                NotFoundError::MemberByEmail {
                    email: email.to_string(),
                    shard: shard_id,
                }
                .into()
            })
    }
}
