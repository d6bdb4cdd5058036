//! In-memory persistence adapter.
//!
//! One shared store implements every driven repository port over a mutexed
//! map of users, sleep records, and follow edges. It backs database-less
//! runs and the integration suites; the sorting, windowing, and aggregation
//! semantics deliberately mirror the Diesel adapters.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::PageParams;
use uuid::Uuid;

use crate::domain::ports::{
    FollowListEntry, FollowRepository, FollowRepositoryError, SleepRecordRepository,
    SleepRecordRepositoryError, SocialFeedRepository, SocialFeedRepositoryError, UserRepository,
    UserRepositoryError,
};
use crate::domain::{
    FeedEntry, FeedQuerySpec, FeedSortKey, FeedStatistics, FollowEdge, SleepRecord, User, UserId,
};

#[derive(Default)]
struct State {
    users: HashMap<Uuid, User>,
    records: HashMap<Uuid, SleepRecord>,
    follows: Vec<FollowEdge>,
}

/// Shared in-memory store implementing every driven repository port.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn page<T: Clone>(items: &[T], page: PageParams) -> Vec<T> {
        items
            .iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit()).unwrap_or(0))
            .cloned()
            .collect()
    }

    fn feed_entries(state: &State, spec: &FeedQuerySpec, now: DateTime<Utc>) -> Vec<FeedEntry> {
        let window_start = spec.window().start_from(now);
        let mut entries: Vec<FeedEntry> = state
            .records
            .values()
            .filter(|record| {
                record.wake_time().is_some()
                    && record.bedtime() >= window_start
                    && state.follows.iter().any(|edge| {
                        edge.follower_id() == spec.user_id()
                            && edge.followed_id() == record.user_id()
                    })
            })
            .filter_map(|record| {
                let owner = state.users.get(record.user_id().as_uuid())?;
                Some(FeedEntry {
                    record_id: record.id(),
                    owner_id: record.user_id().clone(),
                    owner_display_name: owner.display_name().to_string(),
                    bedtime: record.bedtime(),
                    wake_time: record.wake_time()?,
                    duration_minutes: record.duration_minutes()?,
                    completed: true,
                    created_at: record.created_at(),
                })
            })
            .collect();

        entries.sort_by(|a, b| {
            let ordering = match spec.sort() {
                FeedSortKey::Duration => b.duration_minutes.cmp(&a.duration_minutes),
                FeedSortKey::Bedtime => b.bedtime.cmp(&a.bedtime),
                FeedSortKey::WakeTime => b.wake_time.cmp(&a.wake_time),
                FeedSortKey::CreatedAt => b.created_at.cmp(&a.created_at),
            };
            ordering.then_with(|| b.record_id.cmp(&a.record_id))
        });
        entries
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        self.lock().users.insert(*user.id().as_uuid(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.lock().users.get(user_id.as_uuid()).cloned())
    }

    async fn exists(&self, user_id: &UserId) -> Result<bool, UserRepositoryError> {
        Ok(self.lock().users.contains_key(user_id.as_uuid()))
    }

    async fn list(&self, page: PageParams) -> Result<Vec<User>, UserRepositoryError> {
        let mut users: Vec<User> = self.lock().users.values().cloned().collect();
        users.sort_by(|a, b| {
            a.display_name()
                .as_ref()
                .cmp(b.display_name().as_ref())
                .then_with(|| a.id().as_uuid().cmp(b.id().as_uuid()))
        });
        Ok(Self::page(&users, page))
    }

    async fn count(&self) -> Result<i64, UserRepositoryError> {
        Ok(self.lock().users.len() as i64)
    }

    async fn list_ids(&self) -> Result<Vec<UserId>, UserRepositoryError> {
        Ok(self
            .lock()
            .users
            .values()
            .map(|user| user.id().clone())
            .collect())
    }
}

#[async_trait]
impl SleepRecordRepository for MemoryStore {
    async fn insert(&self, record: &SleepRecord) -> Result<(), SleepRecordRepositoryError> {
        let mut state = self.lock();
        // Mirror the partial unique index: one active session per user.
        let already_active = state.records.values().any(|existing| {
            existing.user_id() == record.user_id() && existing.wake_time().is_none()
        });
        if record.wake_time().is_none() && already_active {
            return Err(SleepRecordRepositoryError::active_session_exists());
        }
        state.records.insert(record.id(), record.clone());
        Ok(())
    }

    async fn complete(&self, record: &SleepRecord) -> Result<(), SleepRecordRepositoryError> {
        self.lock().records.insert(record.id(), record.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        record_id: &Uuid,
    ) -> Result<Option<SleepRecord>, SleepRecordRepositoryError> {
        Ok(self.lock().records.get(record_id).cloned())
    }

    async fn find_active_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<SleepRecord>, SleepRecordRepositoryError> {
        Ok(self
            .lock()
            .records
            .values()
            .find(|record| record.user_id() == user_id && record.wake_time().is_none())
            .cloned())
    }

    async fn find_latest_starting_before(
        &self,
        user_id: &UserId,
        bedtime: DateTime<Utc>,
    ) -> Result<Option<SleepRecord>, SleepRecordRepositoryError> {
        Ok(self
            .lock()
            .records
            .values()
            .filter(|record| record.user_id() == user_id && record.bedtime() <= bedtime)
            .max_by_key(|record| record.bedtime())
            .cloned())
    }

    async fn delete(
        &self,
        record_id: &Uuid,
        user_id: &UserId,
    ) -> Result<bool, SleepRecordRepositoryError> {
        let mut state = self.lock();
        let owned = state
            .records
            .get(record_id)
            .is_some_and(|record| record.user_id() == user_id);
        if owned {
            state.records.remove(record_id);
        }
        Ok(owned)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        page: PageParams,
    ) -> Result<Vec<SleepRecord>, SleepRecordRepositoryError> {
        let mut records: Vec<SleepRecord> = self
            .lock()
            .records
            .values()
            .filter(|record| record.user_id() == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.bedtime().cmp(&a.bedtime()).then_with(|| b.id().cmp(&a.id())));
        Ok(Self::page(&records, page))
    }

    async fn count_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<i64, SleepRecordRepositoryError> {
        Ok(self
            .lock()
            .records
            .values()
            .filter(|record| record.user_id() == user_id)
            .count() as i64)
    }
}

#[async_trait]
impl FollowRepository for MemoryStore {
    async fn insert(&self, edge: &FollowEdge) -> Result<(), FollowRepositoryError> {
        let mut state = self.lock();
        let duplicate = state.follows.iter().any(|existing| {
            existing.follower_id() == edge.follower_id()
                && existing.followed_id() == edge.followed_id()
        });
        if duplicate {
            return Err(FollowRepositoryError::duplicate_edge());
        }
        state.follows.push(edge.clone());
        Ok(())
    }

    async fn delete(
        &self,
        follower: &UserId,
        followed: &UserId,
    ) -> Result<bool, FollowRepositoryError> {
        let mut state = self.lock();
        let before = state.follows.len();
        state
            .follows
            .retain(|edge| !(edge.follower_id() == follower && edge.followed_id() == followed));
        Ok(state.follows.len() < before)
    }

    async fn exists(
        &self,
        follower: &UserId,
        followed: &UserId,
    ) -> Result<bool, FollowRepositoryError> {
        Ok(self
            .lock()
            .follows
            .iter()
            .any(|edge| edge.follower_id() == follower && edge.followed_id() == followed))
    }

    async fn following_count(&self, user_id: &UserId) -> Result<i64, FollowRepositoryError> {
        Ok(self
            .lock()
            .follows
            .iter()
            .filter(|edge| edge.follower_id() == user_id)
            .count() as i64)
    }

    async fn followers_count(&self, user_id: &UserId) -> Result<i64, FollowRepositoryError> {
        Ok(self
            .lock()
            .follows
            .iter()
            .filter(|edge| edge.followed_id() == user_id)
            .count() as i64)
    }

    async fn list_following(
        &self,
        user_id: &UserId,
        page: PageParams,
    ) -> Result<Vec<FollowListEntry>, FollowRepositoryError> {
        let state = self.lock();
        let mut entries: Vec<FollowListEntry> = state
            .follows
            .iter()
            .filter(|edge| edge.follower_id() == user_id)
            .filter_map(|edge| {
                let related = state.users.get(edge.followed_id().as_uuid())?;
                Some(FollowListEntry {
                    user_id: edge.followed_id().clone(),
                    display_name: related.display_name().to_string(),
                    followed_at: edge.created_at(),
                })
            })
            .collect();
        entries.sort_by(|a, b| b.followed_at.cmp(&a.followed_at));
        Ok(Self::page(&entries, page))
    }

    async fn list_followers(
        &self,
        user_id: &UserId,
        page: PageParams,
    ) -> Result<Vec<FollowListEntry>, FollowRepositoryError> {
        let state = self.lock();
        let mut entries: Vec<FollowListEntry> = state
            .follows
            .iter()
            .filter(|edge| edge.followed_id() == user_id)
            .filter_map(|edge| {
                let related = state.users.get(edge.follower_id().as_uuid())?;
                Some(FollowListEntry {
                    user_id: edge.follower_id().clone(),
                    display_name: related.display_name().to_string(),
                    followed_at: edge.created_at(),
                })
            })
            .collect();
        entries.sort_by(|a, b| b.followed_at.cmp(&a.followed_at));
        Ok(Self::page(&entries, page))
    }
}

#[async_trait]
impl SocialFeedRepository for MemoryStore {
    async fn list_entries(
        &self,
        spec: &FeedQuerySpec,
        now: DateTime<Utc>,
    ) -> Result<Vec<FeedEntry>, SocialFeedRepositoryError> {
        let state = self.lock();
        let entries = Self::feed_entries(&state, spec, now);
        Ok(Self::page(&entries, spec.page()))
    }

    async fn count_entries(
        &self,
        spec: &FeedQuerySpec,
        now: DateTime<Utc>,
    ) -> Result<i64, SocialFeedRepositoryError> {
        let state = self.lock();
        Ok(Self::feed_entries(&state, spec, now).len() as i64)
    }

    async fn statistics(
        &self,
        spec: &FeedQuerySpec,
        now: DateTime<Utc>,
    ) -> Result<FeedStatistics, SocialFeedRepositoryError> {
        let state = self.lock();
        Ok(FeedStatistics::from_entries(&Self::feed_entries(
            &state, spec, now,
        )))
    }
}
