//! Launch - One flight of one rocket
//!
//! A Launch references its vehicle and its provider by business key;
//! it never owns them.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use super::entity::{Entity, EntityKind, EntityMeta};
use super::error::{non_blank, ValidationError};
use super::launch_service_provider::{LaunchServiceProvider, LaunchServiceProviderKey};
use super::rocket::{Rocket, RocketKey};

/// How a launch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LaunchOutcome {
    Failed,
    Successful,
}

impl LaunchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Failed => "FAILED",
            Self::Successful => "SUCCESSFUL",
        }
    }
}

impl FromStr for LaunchOutcome {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FAILED" => Ok(Self::Failed),
            "SUCCESSFUL" => Ok(Self::Successful),
            other => Err(ValidationError::invalid(
                "launchOutcome",
                format!("'{}' must be FAILED or SUCCESSFUL", other),
            )),
        }
    }
}

impl fmt::Display for LaunchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Business key of a launch
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchKey {
    pub launch_date: DateTime<Utc>,
    pub launch_vehicle: RocketKey,
    pub launch_service_provider: LaunchServiceProviderKey,
    pub orbit: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Launch {
    #[serde(flatten)]
    meta: EntityMeta,
    launch_date: DateTime<Utc>,
    launch_vehicle: RocketKey,
    launch_service_provider: LaunchServiceProviderKey,
    payload: BTreeSet<String>,
    launch_site: String,
    orbit: String,
    function: Option<String>,
    launch_outcome: Option<LaunchOutcome>,
    price: u64,
}

impl Launch {
    /// Create a launch of `vehicle` operated by `provider`
    ///
    /// Fails when the launch year precedes the vehicle's first flight year.
    pub fn new(
        launch_date: DateTime<Utc>,
        vehicle: &Rocket,
        provider: &LaunchServiceProvider,
        launch_site: impl Into<String>,
        orbit: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        if let Some(first) = vehicle.first_year_flight() {
            if launch_date.year() < first {
                return Err(ValidationError::inconsistent(
                    "launchDate",
                    format!(
                        "Launch date {} is earlier than the rocket's first flight year {}",
                        launch_date.date_naive(),
                        first
                    ),
                ));
            }
        }

        Ok(Self {
            meta: EntityMeta::default(),
            launch_date,
            launch_vehicle: vehicle.key(),
            launch_service_provider: provider.key(),
            payload: BTreeSet::new(),
            launch_site: non_blank("launchSite", launch_site)?,
            orbit: non_blank("orbit", orbit)?,
            function: None,
            launch_outcome: None,
            price: 0,
        })
    }

    // ========== Getters ==========

    pub fn launch_date(&self) -> DateTime<Utc> {
        self.launch_date
    }

    pub fn launch_vehicle(&self) -> &RocketKey {
        &self.launch_vehicle
    }

    /// Manufacturer of the vehicle, which may differ from the operator
    pub fn manufacturer(&self) -> &LaunchServiceProviderKey {
        &self.launch_vehicle.manufacturer
    }

    pub fn launch_service_provider(&self) -> &LaunchServiceProviderKey {
        &self.launch_service_provider
    }

    pub fn payload(&self) -> &BTreeSet<String> {
        &self.payload
    }

    pub fn launch_site(&self) -> &str {
        &self.launch_site
    }

    pub fn orbit(&self) -> &str {
        &self.orbit
    }

    pub fn function(&self) -> Option<&str> {
        self.function.as_deref()
    }

    pub fn launch_outcome(&self) -> Option<LaunchOutcome> {
        self.launch_outcome
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    /// Whether the launch is scheduled strictly after `now`
    pub fn is_planned(&self, now: DateTime<Utc>) -> bool {
        self.launch_date > now
    }

    pub fn is_failed(&self) -> bool {
        self.launch_outcome == Some(LaunchOutcome::Failed)
    }

    // ========== Setters ==========

    pub fn set_payload(&mut self, payload: impl IntoIterator<Item = String>) {
        self.payload = payload.into_iter().collect();
    }

    pub fn set_launch_site(&mut self, site: impl Into<String>) -> Result<(), ValidationError> {
        self.launch_site = non_blank("launchSite", site)?;
        Ok(())
    }

    pub fn set_function(&mut self, function: impl Into<String>) -> Result<(), ValidationError> {
        self.function = Some(non_blank("function", function)?);
        Ok(())
    }

    pub fn set_launch_outcome(&mut self, outcome: LaunchOutcome) {
        self.launch_outcome = Some(outcome);
    }

    pub fn set_price(&mut self, price: u64) {
        self.price = price;
    }
}

impl Entity for Launch {
    const KIND: EntityKind = EntityKind::Launch;
    type Key = LaunchKey;

    fn key(&self) -> LaunchKey {
        LaunchKey {
            launch_date: self.launch_date,
            launch_vehicle: self.launch_vehicle.clone(),
            launch_service_provider: self.launch_service_provider.clone(),
            orbit: self.orbit.clone(),
        }
    }

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }
}

impl PartialEq for Launch {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Launch {}

impl Hash for Launch {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}
