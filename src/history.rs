//! Lock history across tracked identities
//!
//! For every identity the aggregator walks back [`HISTORY_WEEKS`] epochs
//! from the latest one, asks for the epoch aggregate and the identity's
//! locked amount, and keeps the epochs where something is locked.

use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constants::HISTORY_WEEKS;
use crate::error::Result;
use crate::identity::Identity;
use crate::query::LockQueryService;
use crate::rewards::RewardScheduleTable;
use crate::types::LockRecord;

/// Which epoch the per-epoch aggregate is read from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateEpoch {
    /// The same epoch as the identity's lock
    #[default]
    PerIteration,
    /// Always the latest epoch. Older wallet builds showed this; the totals
    /// then describe the current epoch, not the locking one.
    Latest,
}

/// History aggregation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Queries in flight per identity
    pub max_concurrent_queries: usize,
    pub aggregate_epoch: AggregateEpoch,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_concurrent_queries: 4,
            aggregate_epoch: AggregateEpoch::PerIteration,
        }
    }
}

/// Records per identity, in tracking order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockHistory {
    pub identities: Vec<(Identity, Vec<LockRecord>)>,
}

impl LockHistory {
    /// Records of `identity`, if it was tracked
    pub fn records_for(&self, identity: &Identity) -> Option<&[LockRecord]> {
        self.identities
            .iter()
            .find(|(id, _)| id == identity)
            .map(|(_, records)| records.as_slice())
    }

    /// All records, identity-major, newest epoch first within an identity
    pub fn flatten(&self) -> Vec<LockRecord> {
        self.identities
            .iter()
            .flat_map(|(_, records)| records.iter().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.identities.iter().map(|(_, r)| r.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct HistoryAggregator {
    queries: LockQueryService,
    rewards: RewardScheduleTable,
    config: HistoryConfig,
}

impl HistoryAggregator {
    pub fn new(queries: LockQueryService) -> Self {
        Self {
            queries,
            rewards: RewardScheduleTable::default(),
            config: HistoryConfig::default(),
        }
    }

    pub fn with_config(mut self, config: HistoryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_rewards(mut self, rewards: RewardScheduleTable) -> Self {
        self.rewards = rewards;
        self
    }

    /// Build the lock history of `identities` ending at `latest_epoch`.
    ///
    /// Epochs before 0 are not queried. The first failing query aborts the
    /// whole aggregation.
    pub async fn aggregate(
        &self,
        identities: &[Identity],
        latest_epoch: u32,
    ) -> Result<LockHistory> {
        info!(identities = identities.len(), latest_epoch, "Aggregating lock history");

        let mut history = LockHistory::default();
        for identity in identities {
            let records = self.identity_history(identity, latest_epoch).await?;
            debug!(%identity, records = records.len(), "Identity history");
            history.identities.push((*identity, records));
        }
        Ok(history)
    }

    async fn identity_history(
        &self,
        identity: &Identity,
        latest_epoch: u32,
    ) -> Result<Vec<LockRecord>> {
        let window = (0..HISTORY_WEEKS).filter_map(|weeks_ago| {
            latest_epoch
                .checked_sub(weeks_ago)
                .map(|epoch| (weeks_ago, epoch))
        });

        // `buffered` keeps input order regardless of completion order.
        let records: Vec<Option<LockRecord>> = stream::iter(window)
            .map(|(weeks_ago, epoch)| self.record_for(identity, weeks_ago, epoch, latest_epoch))
            .buffered(self.config.max_concurrent_queries.max(1))
            .try_collect()
            .await?;

        Ok(records.into_iter().flatten().collect())
    }

    async fn record_for(
        &self,
        identity: &Identity,
        weeks_ago: u32,
        epoch: u32,
        latest_epoch: u32,
    ) -> Result<Option<LockRecord>> {
        let epoch_for_user_lock = epoch;
        let epoch_for_aggregate = match self.config.aggregate_epoch {
            AggregateEpoch::PerIteration => epoch,
            AggregateEpoch::Latest => latest_epoch,
        };

        let (aggregate, locked_amount) = futures::try_join!(
            self.queries.get_lock_info_per_epoch(epoch_for_aggregate),
            self.queries.get_user_lock_info(identity, epoch_for_user_lock),
        )?;

        if locked_amount == 0 {
            return Ok(None);
        }

        Ok(Some(LockRecord {
            epoch,
            locked_amount,
            weeks_locked: weeks_ago,
            total_locked_amount_in_epoch: aggregate.lock_amount,
            current_bonus_amount_in_epoch: aggregate.bonus_amount,
            early_unlock_percent: self.rewards.lookup(weeks_ago)?,
            full_unlock_percent: self.rewards.full_unlock_percent(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ContractClient;
    use crate::error::QearnError;
    use crate::transport::MockTransport;
    use std::sync::Arc;
    use std::time::Duration;

    const LATEST: u32 = 119;

    fn aggregator(mock: &Arc<MockTransport>) -> HistoryAggregator {
        HistoryAggregator::new(LockQueryService::new(ContractClient::new(mock.clone())))
    }

    #[tokio::test]
    async fn test_zero_lock_is_skipped() {
        let identity = Identity::from_bytes([1u8; 32]);
        let mock = Arc::new(MockTransport::new().with_user_lock(identity, LATEST - 5, 0));

        let history = aggregator(&mock).aggregate(&[identity], LATEST).await.unwrap();
        assert!(history.is_empty());
        assert_eq!(history.records_for(&identity), Some(&[][..]));
    }

    #[tokio::test]
    async fn test_lock_record_fields() {
        let identity = Identity::from_bytes([1u8; 32]);
        let epoch = LATEST - 5;
        let mock = Arc::new(
            MockTransport::new()
                .with_user_lock(identity, epoch, 100)
                .with_epoch_info(epoch, 10_000, 300)
                .with_epoch_info(LATEST, 99_999, 999),
        );

        let records = aggregator(&mock).aggregate(&[identity], LATEST).await.unwrap().flatten();
        assert_eq!(
            records,
            vec![LockRecord {
                epoch,
                locked_amount: 100,
                weeks_locked: 5,
                total_locked_amount_in_epoch: 10_000,
                current_bonus_amount_in_epoch: 300,
                early_unlock_percent: RewardScheduleTable::default().lookup(5).unwrap(),
                full_unlock_percent: 100,
            }]
        );
    }

    #[tokio::test]
    async fn test_latest_aggregate_epoch() {
        let identity = Identity::from_bytes([1u8; 32]);
        let epoch = LATEST - 5;
        let mock = Arc::new(
            MockTransport::new()
                .with_user_lock(identity, epoch, 100)
                .with_epoch_info(epoch, 10_000, 300)
                .with_epoch_info(LATEST, 99_999, 999),
        );

        let records = aggregator(&mock)
            .with_config(HistoryConfig {
                aggregate_epoch: AggregateEpoch::Latest,
                ..Default::default()
            })
            .aggregate(&[identity], LATEST)
            .await
            .unwrap()
            .flatten();

        assert_eq!(records[0].epoch, epoch);
        assert_eq!(records[0].total_locked_amount_in_epoch, 99_999);
        assert_eq!(records[0].current_bonus_amount_in_epoch, 999);
    }

    #[tokio::test]
    async fn test_query_count_and_order() {
        let a = Identity::from_bytes([0xaa; 32]);
        let b = Identity::from_bytes([0xbb; 32]);
        let c = Identity::from_bytes([0xcc; 32]);
        let mock = Arc::new(
            MockTransport::new()
                .with_user_lock(b, LATEST - 30, 3)
                .with_user_lock(a, LATEST - 40, 4)
                .with_user_lock(a, LATEST, 1)
                .with_user_lock(b, LATEST - 2, 2)
                .with_user_lock(a, LATEST - 51, 5),
        );

        let history = aggregator(&mock)
            .with_config(HistoryConfig {
                max_concurrent_queries: 8,
                ..Default::default()
            })
            .aggregate(&[b, a, c], LATEST)
            .await
            .unwrap();

        assert_eq!(mock.epoch_info_calls(), 52 * 3);
        assert_eq!(mock.user_lock_calls(), 52 * 3);

        let order: Vec<u32> = history.flatten().iter().map(|r| r.weeks_locked).collect();
        assert_eq!(order, vec![2, 30, 0, 40, 51]);

        let ids: Vec<Identity> = history.identities.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![b, a, c]);
        assert_eq!(history.records_for(&a).unwrap()[0].epoch, LATEST);
        assert!(history.records_for(&c).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_order_kept_when_answers_arrive_out_of_order() {
        let identity = Identity::from_bytes([0xdd; 32]);
        // Newer epochs answer slower, so later window entries finish first.
        let mut mock = MockTransport::new();
        for weeks_ago in 0..HISTORY_WEEKS {
            let epoch = LATEST - weeks_ago;
            let delay = Duration::from_millis(u64::from(HISTORY_WEEKS - weeks_ago));
            mock = mock
                .with_user_lock(identity, epoch, u64::from(weeks_ago) + 1)
                .with_epoch_delay(epoch, delay);
        }
        let mock = Arc::new(mock);

        let records = aggregator(&mock)
            .with_config(HistoryConfig {
                max_concurrent_queries: 8,
                ..Default::default()
            })
            .aggregate(&[identity], LATEST)
            .await
            .unwrap()
            .flatten();

        let answered = mock.answered_epochs().await;
        let mut arrival_sorted = answered.clone();
        arrival_sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_ne!(answered, arrival_sorted);

        let weeks: Vec<u32> = records.iter().map(|r| r.weeks_locked).collect();
        assert_eq!(weeks, (0..HISTORY_WEEKS).collect::<Vec<_>>());
        assert!(records
            .iter()
            .all(|r| r.locked_amount == u64::from(r.weeks_locked) + 1));
    }

    #[tokio::test]
    async fn test_window_clipped_at_epoch_zero() {
        let identity = Identity::from_bytes([1u8; 32]);
        let mock = Arc::new(MockTransport::new().with_user_lock(identity, 0, 7));

        let records = aggregator(&mock).aggregate(&[identity], 10).await.unwrap().flatten();
        assert_eq!(mock.user_lock_calls(), 11);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].weeks_locked, 10);
    }

    #[tokio::test]
    async fn test_failure_aborts() {
        let identity = Identity::from_bytes([1u8; 32]);
        let mock = Arc::new(MockTransport::new().with_available(false));

        let err = aggregator(&mock).aggregate(&[identity], LATEST).await.unwrap_err();
        assert!(matches!(err, QearnError::QueryFailed(_)));
    }
}
