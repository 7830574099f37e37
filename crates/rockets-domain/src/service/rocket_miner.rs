//! Rocket Miner - Ranked views over launch history
//!
//! Every query follows the same shape:
//! 1. Snapshot: read the collections it needs from the repository, once
//! 2. Derive: filter, group and count in memory
//! 3. Rank: sort and cut off with [`rank_and_truncate`]
//!
//! The miner never mutates what it reads and raises no errors of its own
//! beyond argument checks; repository errors pass through unchanged.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use thiserror::Error;

use crate::model::entity::Entity;
use crate::model::launch::Launch;
use crate::model::launch_service_provider::{LaunchServiceProvider, LaunchServiceProviderKey};
use crate::model::rocket::{Rocket, RocketKey};
use crate::repository::snapshot_repository::{Repository, RepositoryError};
use crate::service::clock::{Clock, SystemClock};
use crate::service::logger::{Logger, TracingLogger};
use crate::service::ranking::{
    by_count_then_name, descending, distinct_by, rank, rank_and_truncate, truncate, TiePolicy,
};

/// Errors returned by miner queries
#[derive(Debug, Error)]
pub enum MinerError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("month must be between 1 and 12, got {month}")]
    InvalidMonth { month: u32 },
}

/// RocketMiner - The analytics engine
///
/// Stateless apart from its collaborators: the repository it reads,
/// the logger it reports to and the clock that says what "now" is.
pub struct RocketMiner<R> {
    repo: R,
    logger: Arc<dyn Logger>,
    clock: Arc<dyn Clock>,
}

impl<R: Repository> RocketMiner<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            logger: Arc::new(TracingLogger),
            clock: Arc::new(SystemClock),
        }
    }

    /// Builder: report through a different logger
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Builder: read "now" from a different clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Top-k rockets by number of recorded launches
    ///
    /// Rockets with the same count keep their snapshot order.
    pub fn most_launched_rockets(&self, k: usize) -> Result<Vec<Rocket>, MinerError> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let rockets = self.repo.rockets()?;
        self.logger
            .debug(&format!("Getting all rockets, total = {}", rockets.len()));

        Ok(rank_and_truncate(
            rockets,
            |rocket| rocket.launches().len(),
            descending::<usize>,
            k,
            TiePolicy::Truncate,
        ))
    }

    /// Top-k launches by date, most recent first
    ///
    /// Launches sharing a date are never split: if the k-th and the
    /// (k+1)-th launch have the same date both are returned, so the
    /// result can be longer than `k`.
    pub fn most_recent_launches(&self, k: usize) -> Result<Vec<Launch>, MinerError> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let launches = self.repo.launches()?;
        self.logger
            .debug(&format!("Getting all launches, total = {}", launches.len()));

        Ok(rank_and_truncate(
            launches,
            |launch| launch.launch_date(),
            descending::<DateTime<Utc>>,
            k,
            TiePolicy::KeepTiedGroup,
        ))
    }

    /// Top-k launches by price, at most one per rocket name
    ///
    /// The most expensive launch of each rocket name is kept; rocket names
    /// compare case-insensitively.
    pub fn most_expensive_launches(&self, k: usize) -> Result<Vec<Launch>, MinerError> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let launches = self.repo.launches()?;
        self.logger
            .debug(&format!("Getting all launches, total = {}", launches.len()));

        let ranked = rank(launches, |launch| launch.price(), descending::<u64>);
        let one_per_rocket = distinct_by(ranked, |launch| launch.launch_vehicle().name.to_lowercase());
        Ok(truncate(one_per_rocket, k, TiePolicy::Truncate, descending::<u64>))
    }

    /// Top-k manufacturers by number of launches in a calendar month
    ///
    /// `month` is 1 for January through 12 for December. A launch counts
    /// towards the manufacturer of its vehicle. Equal counts rank
    /// alphabetically by provider name.
    pub fn busiest_launch_service_provider_in_month(
        &self,
        k: usize,
        year: i32,
        month: u32,
    ) -> Result<Vec<LaunchServiceProvider>, MinerError> {
        if !(1..=12).contains(&month) {
            return Err(MinerError::InvalidMonth { month });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let launches = self.repo.launches()?;
        let providers = self.repo.launch_service_providers()?;
        self.logger.debug(&format!(
            "Getting all launches, total = {}; providers, total = {}",
            launches.len(),
            providers.len()
        ));

        let mut counts: BTreeMap<&LaunchServiceProviderKey, usize> = BTreeMap::new();
        for launch in launches.iter().filter(|launch| {
            let date = launch.launch_date();
            date.year() == year && date.month() == month
        }) {
            *counts.entry(launch.manufacturer()).or_default() += 1;
        }

        let by_key: HashMap<LaunchServiceProviderKey, LaunchServiceProvider> = providers
            .into_iter()
            .map(|provider| (provider.key(), provider))
            .collect();

        let mut candidates = Vec::with_capacity(counts.len());
        for (key, count) in counts {
            match by_key.get(key) {
                Some(provider) => candidates.push((count, provider.clone())),
                None => self.logger.warn(&format!(
                    "Skipping {} launches by unknown manufacturer '{}'",
                    count, key.name
                )),
            }
        }

        Ok(rank_and_truncate(
            candidates,
            |(count, provider)| (*count, provider.name().to_string()),
            by_count_then_name,
            k,
            TiePolicy::Truncate,
        )
        .into_iter()
        .map(|(_, provider)| provider)
        .collect())
    }

    /// Top-k manufacturer names by number of failed launches
    ///
    /// Manufacturers without a failed launch never appear. Equal counts
    /// rank alphabetically.
    pub fn most_unreliable_launch_service_providers(&self, k: usize) -> Result<Vec<String>, MinerError> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let launches = self.repo.launches()?;
        self.logger
            .debug(&format!("Getting all launches, total = {}", launches.len()));

        let mut failures: BTreeMap<String, usize> = BTreeMap::new();
        for launch in launches.iter().filter(|launch| launch.is_failed()) {
            *failures.entry(launch.manufacturer().name.clone()).or_default() += 1;
        }

        Ok(rank_and_truncate(
            failures.into_iter().map(|(name, count)| (count, name)),
            |entry| entry.clone(),
            by_count_then_name,
            k,
            TiePolicy::Truncate,
        )
        .into_iter()
        .map(|(_, name)| name)
        .collect())
    }

    /// Rockets with at least `k` launches planned after now
    ///
    /// A threshold, not a ranking: every rocket at or above `k` is
    /// returned, in the order its first planned launch appears.
    pub fn most_number_of_planned_launch(&self, k: usize) -> Result<Vec<Rocket>, MinerError> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let now = self.clock.now();
        let launches = self.repo.launches()?;
        let rockets = self.repo.rockets()?;
        self.logger.debug(&format!(
            "Getting all launches, total = {}; rockets, total = {}",
            launches.len(),
            rockets.len()
        ));

        let mut order: Vec<&RocketKey> = Vec::new();
        let mut counts: HashMap<&RocketKey, usize> = HashMap::new();
        for launch in launches.iter().filter(|launch| launch.is_planned(now)) {
            let count = counts.entry(launch.launch_vehicle()).or_insert_with(|| {
                order.push(launch.launch_vehicle());
                0
            });
            *count += 1;
        }

        let by_key: HashMap<RocketKey, Rocket> = rockets
            .into_iter()
            .map(|rocket| (rocket.key(), rocket))
            .collect();

        let mut result = Vec::new();
        for key in order {
            if counts[key] < k {
                continue;
            }
            match by_key.get(key) {
                Some(rocket) => result.push(rocket.clone()),
                None => self.logger.warn(&format!(
                    "Skipping planned launches of unknown rocket '{}'",
                    key.name
                )),
            }
        }
        Ok(result)
    }
}
