//! Hourly quest layer
//!
//! Quests arrive from an external text-generation service three at a time,
//! at most once per calendar hour. The service sits behind the
//! [`QuestSource`] capability; on any fetch failure (rate limits included)
//! the batch degrades to a local pool of the same shape, so callers never
//! see an error. Progress is applied from finished game results and never
//! regresses.

use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform::storage;

/// Quests per hourly batch
pub const BATCH_SIZE: usize = 3;

/// What a quest measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestKind {
    /// Reach a score in a single game
    Score,
    /// Survive for a number of seconds in a single game
    Survival,
    /// Finish a number of games
    GamesPlayed,
}

/// The shape the generation service returns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestDescriptor {
    pub id: String,
    pub title: String,
    pub description: String,
    pub target: u32,
    #[serde(rename = "type")]
    pub kind: QuestKind,
}

/// A tracked quest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub target: u32,
    pub current: u32,
    #[serde(rename = "type")]
    pub kind: QuestKind,
    pub reward: u32,
    pub completed: bool,
}

impl From<QuestDescriptor> for Quest {
    fn from(d: QuestDescriptor) -> Self {
        Self {
            id: d.id,
            title: d.title,
            description: d.description,
            target: d.target,
            current: 0,
            kind: d.kind,
            reward: 1,
            completed: false,
        }
    }
}

/// Why a fetch failed. Distinguished for logging only; every failure
/// degrades to the offline pool.
#[derive(Debug, Error)]
pub enum QuestFetchError {
    #[error("quest service rate limit reached")]
    RateLimited,
    #[error("quest service unavailable: {0}")]
    Unavailable(String),
}

/// Capability for the external quest-generation service
pub trait QuestSource {
    /// Up to [`BATCH_SIZE`] descriptors themed for the given hour
    fn fetch(&mut self, hour: u32) -> Result<Vec<QuestDescriptor>, QuestFetchError>;
}

fn pool_entry(id: &str, title: &str, description: &str, target: u32, kind: QuestKind) -> QuestDescriptor {
    QuestDescriptor {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        target,
        kind,
    }
}

/// The offline pool, ids keyed by hour so a new hour reads as a new batch
fn fallback_pool(hour: u32) -> Vec<QuestDescriptor> {
    vec![
        pool_entry(
            &format!("fb-1-{hour}"),
            "Dodge Pro",
            "Score 2,500 points",
            2500,
            QuestKind::Score,
        ),
        pool_entry(
            &format!("fb-2-{hour}"),
            "Time Warp",
            "Survive for 45 seconds",
            45,
            QuestKind::Survival,
        ),
        pool_entry(
            &format!("fb-3-{hour}"),
            "Frequent Flyer",
            "Play 3 more games",
            3,
            QuestKind::GamesPlayed,
        ),
        pool_entry(
            &format!("fb-4-{hour}"),
            "Spike Hater",
            "Score 5,000 points",
            5000,
            QuestKind::Score,
        ),
        pool_entry(
            &format!("fb-5-{hour}"),
            "Iron Will",
            "Survive 60 seconds",
            60,
            QuestKind::Survival,
        ),
    ]
}

fn sample_pool(hour: u32, rng: &mut impl Rng) -> Vec<QuestDescriptor> {
    fallback_pool(hour)
        .choose_multiple(rng, BATCH_SIZE)
        .cloned()
        .collect()
}

/// Deterministic stand-in used when no remote service is wired up and as
/// the test double: samples the pool with an hour-seeded RNG.
pub struct LocalQuestPool;

impl QuestSource for LocalQuestPool {
    fn fetch(&mut self, hour: u32) -> Result<Vec<QuestDescriptor>, QuestFetchError> {
        let mut rng = rand_pcg::Pcg32::seed_from_u64(u64::from(hour));
        Ok(sample_pool(hour, &mut rng))
    }
}

/// One batch for the hour: the source's descriptors on success, the
/// offline pool otherwise. Always [`BATCH_SIZE`] quests of identical shape.
pub fn hourly_batch(
    source: &mut dyn QuestSource,
    hour: u32,
    rng: &mut impl Rng,
) -> Vec<Quest> {
    match source.fetch(hour) {
        Ok(descriptors) => {
            log::info!("fetched {} quests for hour {hour}", descriptors.len());
            descriptors
                .into_iter()
                .take(BATCH_SIZE)
                .map(Quest::from)
                .collect()
        }
        Err(err @ QuestFetchError::RateLimited) => {
            log::warn!("{err}; using offline quest pool");
            sample_pool(hour, rng).into_iter().map(Quest::from).collect()
        }
        Err(err) => {
            log::error!("quest fetch failed: {err}; using offline quest pool");
            sample_pool(hour, rng).into_iter().map(Quest::from).collect()
        }
    }
}

/// The persisted batch plus the hour it was fetched
#[derive(Debug, Clone, Default)]
pub struct QuestLog {
    pub quests: Vec<Quest>,
    pub fetched_hour: Option<u32>,
}

impl QuestLog {
    /// LocalStorage keys (batch and cache key stored separately)
    const QUESTS_KEY: &'static str = "pd_quests";
    const REFRESH_KEY: &'static str = "pd_last_refresh";

    pub fn load() -> Self {
        Self {
            quests: storage::load(Self::QUESTS_KEY).unwrap_or_default(),
            fetched_hour: storage::load(Self::REFRESH_KEY),
        }
    }

    pub fn save(&self) {
        storage::save(Self::QUESTS_KEY, &self.quests);
        if let Some(hour) = self.fetched_hour {
            storage::save(Self::REFRESH_KEY, &hour);
        }
    }

    /// A batch is stale when absent or fetched in a different hour
    pub fn needs_refresh(&self, hour: u32) -> bool {
        self.quests.is_empty() || self.fetched_hour != Some(hour)
    }

    /// Fetch a new batch if stale. Returns true when the batch changed.
    pub fn refresh(
        &mut self,
        source: &mut dyn QuestSource,
        hour: u32,
        rng: &mut impl Rng,
    ) -> bool {
        if !self.needs_refresh(hour) {
            return false;
        }
        self.quests = hourly_batch(source, hour, rng);
        self.fetched_hour = Some(hour);
        true
    }

    /// Apply one finished game. Score/survival quests keep their best
    /// value, games-played quests count up, completed quests are frozen.
    /// Returns the number of quests newly completed.
    pub fn apply_game_result(&mut self, score: u64, survival_secs: u32) -> u32 {
        let score = score.min(u64::from(u32::MAX)) as u32;
        let mut newly_completed = 0;
        for quest in &mut self.quests {
            if quest.completed {
                continue;
            }
            quest.current = match quest.kind {
                QuestKind::Score => quest.current.max(score),
                QuestKind::Survival => quest.current.max(survival_secs),
                QuestKind::GamesPlayed => quest.current + 1,
            };
            if quest.current >= quest.target {
                quest.completed = true;
                newly_completed += 1;
                log::info!("quest completed: {}", quest.title);
            }
        }
        newly_completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_pcg::Pcg32;

    struct FailingSource(QuestFetchError);

    impl QuestSource for FailingSource {
        fn fetch(&mut self, _hour: u32) -> Result<Vec<QuestDescriptor>, QuestFetchError> {
            Err(match &self.0 {
                QuestFetchError::RateLimited => QuestFetchError::RateLimited,
                QuestFetchError::Unavailable(msg) => QuestFetchError::Unavailable(msg.clone()),
            })
        }
    }

    struct CountingSource {
        calls: u32,
    }

    impl QuestSource for CountingSource {
        fn fetch(&mut self, hour: u32) -> Result<Vec<QuestDescriptor>, QuestFetchError> {
            self.calls += 1;
            LocalQuestPool.fetch(hour)
        }
    }

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(99)
    }

    #[test]
    fn test_fallback_batch_matches_success_shape() {
        let mut failing = FailingSource(QuestFetchError::RateLimited);
        let batch = hourly_batch(&mut failing, 14, &mut rng());
        assert_eq!(batch.len(), BATCH_SIZE);
        for quest in &batch {
            assert_eq!(quest.current, 0);
            assert_eq!(quest.reward, 1);
            assert!(!quest.completed);
            assert!(quest.id.ends_with("-14"));
        }
        // Distinct entries
        assert_ne!(batch[0].id, batch[1].id);
        assert_ne!(batch[1].id, batch[2].id);
    }

    #[test]
    fn test_unavailable_also_degrades() {
        let mut failing = FailingSource(QuestFetchError::Unavailable("boom".into()));
        let batch = hourly_batch(&mut failing, 3, &mut rng());
        assert_eq!(batch.len(), BATCH_SIZE);
    }

    #[test]
    fn test_local_pool_is_deterministic_per_hour() {
        let a = LocalQuestPool.fetch(8).unwrap();
        let b = LocalQuestPool.fetch(8).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_refresh_caches_within_the_hour() {
        let mut source = CountingSource { calls: 0 };
        let mut log = QuestLog::default();

        assert!(log.refresh(&mut source, 10, &mut rng()));
        assert_eq!(source.calls, 1);
        assert_eq!(log.fetched_hour, Some(10));

        // Same hour: served from the cached batch
        assert!(!log.refresh(&mut source, 10, &mut rng()));
        assert_eq!(source.calls, 1);

        // Hour rolled over: refetch
        assert!(log.refresh(&mut source, 11, &mut rng()));
        assert_eq!(source.calls, 2);
    }

    fn quest(kind: QuestKind, target: u32) -> Quest {
        Quest::from(QuestDescriptor {
            id: "q".into(),
            title: "t".into(),
            description: "d".into(),
            target,
            kind,
        })
    }

    #[test]
    fn test_progress_never_regresses() {
        let mut log = QuestLog {
            quests: vec![quest(QuestKind::Score, 5000), quest(QuestKind::Survival, 90)],
            fetched_hour: Some(0),
        };

        log.apply_game_result(3000, 40);
        assert_eq!(log.quests[0].current, 3000);
        assert_eq!(log.quests[1].current, 40);

        // A worse game leaves the best values in place
        log.apply_game_result(100, 5);
        assert_eq!(log.quests[0].current, 3000);
        assert_eq!(log.quests[1].current, 40);
    }

    #[test]
    fn test_completion_freezes_quest() {
        let mut log = QuestLog {
            quests: vec![quest(QuestKind::GamesPlayed, 2)],
            fetched_hour: Some(0),
        };

        assert_eq!(log.apply_game_result(0, 0), 0);
        assert_eq!(log.apply_game_result(0, 0), 1);
        let frozen = log.quests[0].clone();
        assert!(frozen.completed);

        // Further games change nothing, and it is not re-counted
        assert_eq!(log.apply_game_result(9999, 9999), 0);
        assert_eq!(log.quests[0], frozen);
    }
}
