//! Driving port for follow graph mutations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Error, FollowEdge, UserId};

/// Serialisable follow edge projection for driving ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowEdgePayload {
    pub id: Uuid,
    pub follower_id: UserId,
    pub followed_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl From<FollowEdge> for FollowEdgePayload {
    fn from(value: FollowEdge) -> Self {
        Self {
            id: value.id(),
            follower_id: value.follower_id().clone(),
            followed_id: value.followed_id().clone(),
            created_at: value.created_at(),
        }
    }
}

/// Request to follow another user.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowRequest {
    pub follower: UserId,
    pub target: UserId,
}

/// Response from creating a follow edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowResponse {
    pub edge: FollowEdgePayload,
}

/// Request to remove a follow edge.
#[derive(Debug, Clone, PartialEq)]
pub struct UnfollowRequest {
    pub follower: UserId,
    pub target: UserId,
}

/// Driving port for follow graph write operations.
///
/// Both mutations finish with the §4.1 invalidation sweep: the follower's
/// following list/count, the target's followers list/count, and the
/// follower's social statistics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowCommand: Send + Sync {
    /// Create a follow edge. Fails with `invalid_request` on self-follow,
    /// `not_found` when the target does not exist, and `conflict` on a
    /// duplicate edge.
    async fn follow(&self, request: FollowRequest) -> Result<FollowResponse, Error>;

    /// Remove a follow edge. Fails with `not_found` when no edge exists.
    async fn unfollow(&self, request: UnfollowRequest) -> Result<(), Error>;
}

/// Fixture command implementation echoing the requested edge.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFollowCommand;

#[async_trait]
impl FollowCommand for FixtureFollowCommand {
    async fn follow(&self, request: FollowRequest) -> Result<FollowResponse, Error> {
        if request.follower == request.target {
            return Err(Error::invalid_request("users cannot follow themselves"));
        }
        Ok(FollowResponse {
            edge: FollowEdgePayload {
                id: Uuid::new_v4(),
                follower_id: request.follower,
                followed_id: request.target,
                created_at: Utc::now(),
            },
        })
    }

    async fn unfollow(&self, _request: UnfollowRequest) -> Result<(), Error> {
        Ok(())
    }
}
