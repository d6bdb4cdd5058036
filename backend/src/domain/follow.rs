//! Follow edge entity: a directed relationship in the social graph.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::UserId;

/// Validation errors raised by [`FollowEdge::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowValidationError {
    /// A user may not follow themselves.
    SelfFollow,
}

impl fmt::Display for FollowValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfFollow => write!(f, "users cannot follow themselves"),
        }
    }
}

impl std::error::Error for FollowValidationError {}

/// Input payload for [`FollowEdge::new`].
#[derive(Debug, Clone)]
pub struct FollowEdgeDraft {
    pub id: Uuid,
    pub follower_id: UserId,
    pub followed_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// A directed follow relationship.
///
/// The follower's feed includes the followed user's completed sleep records.
/// Uniqueness of the `(follower, followed)` pair is enforced by the edge
/// store; this entity only rules out self-follows.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowEdge {
    id: Uuid,
    follower_id: UserId,
    followed_id: UserId,
    created_at: DateTime<Utc>,
}

impl FollowEdge {
    /// Creates a validated follow edge.
    pub fn new(draft: FollowEdgeDraft) -> Result<Self, FollowValidationError> {
        if draft.follower_id == draft.followed_id {
            return Err(FollowValidationError::SelfFollow);
        }
        Ok(Self {
            id: draft.id,
            follower_id: draft.follower_id,
            followed_id: draft.followed_id,
            created_at: draft.created_at,
        })
    }

    /// Returns the edge id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the follower's user id.
    pub fn follower_id(&self) -> &UserId {
        &self.follower_id
    }

    /// Returns the followed user's id.
    pub fn followed_id(&self) -> &UserId {
        &self.followed_id
    }

    /// Returns the edge creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    //! Self-follow rejection and accessor coverage.
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    use super::{FollowEdge, FollowEdgeDraft, FollowValidationError};
    use crate::domain::UserId;

    #[rstest]
    fn self_follow_is_rejected() {
        let user = UserId::random();
        let err = FollowEdge::new(FollowEdgeDraft {
            id: Uuid::new_v4(),
            follower_id: user.clone(),
            followed_id: user,
            created_at: Utc::now(),
        })
        .expect_err("self-follow rejected");
        assert_eq!(err, FollowValidationError::SelfFollow);
    }

    #[rstest]
    fn distinct_users_build_an_edge() {
        let follower = UserId::random();
        let followed = UserId::random();
        let edge = FollowEdge::new(FollowEdgeDraft {
            id: Uuid::new_v4(),
            follower_id: follower.clone(),
            followed_id: followed.clone(),
            created_at: Utc::now(),
        })
        .expect("valid edge");

        assert_eq!(edge.follower_id(), &follower);
        assert_eq!(edge.followed_id(), &followed);
    }
}
