//! One subcommand per miner query

use clap::{Args, Subcommand};
use rockets_domain::model::launch::Launch;
use rockets_domain::model::launch_service_provider::LaunchServiceProvider;
use rockets_domain::model::rocket::Rocket;
use rockets_domain::repository::snapshot_repository::Repository;
use rockets_domain::service::rocket_miner::{MinerError, RocketMiner};

#[derive(Debug, Subcommand)]
pub enum Query {
    /// Rockets with the most recorded launches
    MostLaunched(TopK),
    /// Most recent launches; launches sharing a date are never split
    MostRecent(TopK),
    /// Most expensive launches, one per rocket name
    MostExpensive(TopK),
    /// Manufacturers with the most launches in a month
    Busiest(BusiestArgs),
    /// Manufacturers with the most failed launches
    MostUnreliable(TopK),
    /// Rockets with at least k launches still to fly
    Planned(TopK),
}

#[derive(Debug, Args)]
pub struct TopK {
    /// How many results to return (the config's defaultK if omitted)
    #[arg(short)]
    pub k: Option<usize>,
}

#[derive(Debug, Args)]
pub struct BusiestArgs {
    #[arg(long)]
    pub year: i32,

    /// 1 for January through 12 for December
    #[arg(long)]
    pub month: u32,

    #[command(flatten)]
    pub top: TopK,
}

/// What a query produced
#[derive(Debug)]
pub enum Report {
    Rockets(Vec<Rocket>),
    Launches(Vec<Launch>),
    Providers(Vec<LaunchServiceProvider>),
    Names(Vec<String>),
}

impl Query {
    pub fn run<R: Repository>(&self, miner: &RocketMiner<R>, default_k: usize) -> Result<Report, MinerError> {
        let k = |top: &TopK| top.k.unwrap_or(default_k);
        Ok(match self {
            Query::MostLaunched(top) => Report::Rockets(miner.most_launched_rockets(k(top))?),
            Query::MostRecent(top) => Report::Launches(miner.most_recent_launches(k(top))?),
            Query::MostExpensive(top) => Report::Launches(miner.most_expensive_launches(k(top))?),
            Query::Busiest(args) => Report::Providers(miner.busiest_launch_service_provider_in_month(
                k(&args.top),
                args.year,
                args.month,
            )?),
            Query::MostUnreliable(top) => {
                Report::Names(miner.most_unreliable_launch_service_providers(k(top))?)
            }
            Query::Planned(top) => Report::Rockets(miner.most_number_of_planned_launch(k(top))?),
        })
    }
}

impl Report {
    pub fn len(&self) -> usize {
        match self {
            Report::Rockets(items) => items.len(),
            Report::Launches(items) => items.len(),
            Report::Providers(items) => items.len(),
            Report::Names(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pretty-printed JSON array
    pub fn to_json(&self) -> serde_json::Result<String> {
        match self {
            Report::Rockets(items) => serde_json::to_string_pretty(items),
            Report::Launches(items) => serde_json::to_string_pretty(items),
            Report::Providers(items) => serde_json::to_string_pretty(items),
            Report::Names(items) => serde_json::to_string_pretty(items),
        }
    }

    /// One line per result
    pub fn to_lines(&self) -> Vec<String> {
        match self {
            Report::Rockets(items) => items
                .iter()
                .map(|r| {
                    format!(
                        "{} ({} {}) by {}, {} launches",
                        r.name(),
                        r.family_name(),
                        r.variation_name(),
                        r.manufacturer().name,
                        r.launches().len()
                    )
                })
                .collect(),
            Report::Launches(items) => items
                .iter()
                .map(|l| {
                    let outcome = l.launch_outcome().map(|o| o.as_str()).unwrap_or("UNKNOWN");
                    format!(
                        "{} {} from {} to {}, {} [{}]",
                        l.launch_date().format("%Y-%m-%d"),
                        l.launch_vehicle().name,
                        l.launch_site(),
                        l.orbit(),
                        l.price(),
                        outcome
                    )
                })
                .collect(),
            Report::Providers(items) => items
                .iter()
                .map(|p| format!("{} ({}, founded {})", p.name(), p.country(), p.year_founded()))
                .collect(),
            Report::Names(items) => items.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rockets_adapter::repository::InMemoryRepository;
    use rockets_domain::model::launch::LaunchOutcome;
    use rockets_domain::service::clock::FixedClock;
    use rockets_domain::service::logger::NullLogger;
    use std::sync::Arc;

    fn miner() -> RocketMiner<InMemoryRepository> {
        let repo = InMemoryRepository::new();
        let ula = repo
            .save_launch_service_provider(&LaunchServiceProvider::new("ULA", 1990, "USA").unwrap())
            .unwrap();
        let atlas = repo
            .save_rocket(&Rocket::new("Atlas V", "Atlas", "401", "USA", &ula).unwrap())
            .unwrap();
        for (day, outcome) in [(1, LaunchOutcome::Successful), (8, LaunchOutcome::Failed)] {
            let date = Utc.with_ymd_and_hms(2018, 3, day, 0, 0, 0).unwrap();
            let mut launch = Launch::new(date, &atlas, &ula, "Cape Canaveral", "GTO").unwrap();
            launch.set_launch_outcome(outcome);
            launch.set_price(100 * day as u64);
            repo.save_launch(&launch).unwrap();
        }

        let now = Utc.with_ymd_and_hms(2018, 1, 1, 0, 0, 0).unwrap();
        RocketMiner::new(repo)
            .with_logger(Arc::new(NullLogger))
            .with_clock(Arc::new(FixedClock(now)))
    }

    #[test]
    fn test_default_k_applies() {
        let miner = miner();
        let report = Query::MostRecent(TopK { k: None }).run(&miner, 1).unwrap();
        assert_eq!(report.len(), 1);

        let report = Query::MostRecent(TopK { k: Some(5) }).run(&miner, 1).unwrap();
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_text_lines() {
        let miner = miner();
        let report = Query::MostExpensive(TopK { k: Some(1) }).run(&miner, 10).unwrap();
        assert_eq!(
            report.to_lines(),
            vec!["2018-03-08 Atlas V from Cape Canaveral to GTO, 800 [FAILED]"]
        );

        let report = Query::MostLaunched(TopK { k: Some(1) }).run(&miner, 10).unwrap();
        assert_eq!(report.to_lines(), vec!["Atlas V (Atlas 401) by ULA, 2 launches"]);

        let report = Query::MostUnreliable(TopK { k: Some(3) }).run(&miner, 10).unwrap();
        assert_eq!(report.to_lines(), vec!["ULA"]);
    }

    #[test]
    fn test_busiest_and_planned() {
        let miner = miner();
        let busiest = Query::Busiest(BusiestArgs {
            year: 2018,
            month: 3,
            top: TopK { k: Some(1) },
        })
        .run(&miner, 10)
        .unwrap();
        assert_eq!(busiest.to_lines(), vec!["ULA (USA, founded 1990)"]);

        let planned = Query::Planned(TopK { k: Some(2) }).run(&miner, 10).unwrap();
        assert_eq!(planned.len(), 1);
        assert!(Query::Planned(TopK { k: Some(3) }).run(&miner, 10).unwrap().is_empty());
    }

    #[test]
    fn test_bad_month_is_an_error() {
        let err = Query::Busiest(BusiestArgs {
            year: 2018,
            month: 13,
            top: TopK { k: None },
        })
        .run(&miner(), 10)
        .unwrap_err();
        assert!(matches!(err, MinerError::InvalidMonth { month: 13 }));
    }

    #[test]
    fn test_json_output() {
        let report = Query::MostRecent(TopK { k: Some(1) }).run(&miner(), 10).unwrap();
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        let first = &value.as_array().unwrap()[0];
        assert_eq!(first["launchOutcome"], "FAILED");
        assert_eq!(first["price"], 800);
        assert_eq!(first["launchVehicle"]["name"], "Atlas V");
    }
}
