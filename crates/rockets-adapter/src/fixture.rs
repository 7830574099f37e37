//! Fixture Loader - Populate a repository from a JSON document
//!
//! The document holds raw records for each entity kind:
//!
//! ```json
//! {
//!   "launchServiceProviders": [{ "name": "ULA", "yearFounded": 1990, "country": "USA" }],
//!   "rockets": [{ "name": "Atlas V", "familyName": "Atlas", "variationName": "401",
//!                 "country": "USA", "manufacturer": "ULA" }],
//!   "launches": [{ "launchDate": "2018-03-01T00:00:00Z", "launchVehicle": "Atlas V",
//!                  "launchServiceProvider": "ULA", "launchSite": "Cape Canaveral",
//!                  "orbit": "GTO", "launchOutcome": "SUCCESSFUL", "price": 109000000 }],
//!   "users": [{ "email": "ops@example.com" }]
//! }
//! ```
//!
//! Rockets name their manufacturer, and launches their vehicle and provider,
//! by name. When several rockets share a name, a launch narrows the choice
//! with `launchVehicleFamily` and `launchVehicleVariation`; a name that still
//! matches more than one rocket is rejected. Every record goes through the
//! entity constructors and setters, so a record that would not validate in
//! code does not load either.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use rockets_domain::model::entity::{Entity, EntityKind};
use rockets_domain::model::error::ValidationError;
use rockets_domain::model::launch::{Launch, LaunchOutcome};
use rockets_domain::model::launch_service_provider::LaunchServiceProvider;
use rockets_domain::model::rocket::Rocket;
use rockets_domain::model::user::User;
use rockets_domain::repository::snapshot_repository::RepositoryError;

use crate::repository::InMemoryRepository;

/// Errors that can occur while loading a fixture
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed fixture: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid {kind} record #{index}: {source}")]
    Invalid {
        kind: EntityKind,
        index: usize,
        #[source]
        source: ValidationError,
    },

    #[error("{kind} record #{index} names {target} '{name}', which matches {matches} stored entries")]
    AmbiguousReference {
        kind: EntityKind,
        index: usize,
        target: EntityKind,
        name: String,
        matches: usize,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// How many records of each kind were stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub launch_service_providers: usize,
    pub rockets: usize,
    pub launches: usize,
    pub users: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct FixtureDocument {
    launch_service_providers: Vec<ProviderRecord>,
    rockets: Vec<RocketRecord>,
    launches: Vec<LaunchRecord>,
    users: Vec<UserRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderRecord {
    name: Option<String>,
    year_founded: Option<i32>,
    country: Option<String>,
    headquarters: Option<String>,
    wikilink: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RocketRecord {
    name: Option<String>,
    family_name: Option<String>,
    variation_name: Option<String>,
    country: Option<String>,
    manufacturer: Option<String>,
    #[serde(rename = "massToLEO")]
    mass_to_leo: Option<String>,
    #[serde(rename = "massToGTO")]
    mass_to_gto: Option<String>,
    mass_to_other: Option<String>,
    first_year_flight: Option<i32>,
    latest_year_flight: Option<i32>,
    no_launches: Option<u32>,
    wikilink: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LaunchRecord {
    launch_date: Option<DateTime<Utc>>,
    launch_vehicle: Option<String>,
    launch_vehicle_family: Option<String>,
    launch_vehicle_variation: Option<String>,
    launch_service_provider: Option<String>,
    launch_site: Option<String>,
    orbit: Option<String>,
    #[serde(default)]
    payload: Vec<String>,
    function: Option<String>,
    launch_outcome: Option<String>,
    price: Option<u64>,
    wikilink: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    password: Option<String>,
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::MissingField { field })
}

impl ProviderRecord {
    fn into_entity(self) -> Result<LaunchServiceProvider, ValidationError> {
        let mut provider = LaunchServiceProvider::new(
            required(self.name, "name")?,
            required(self.year_founded, "yearFounded")?,
            required(self.country, "country")?,
        )?;
        if let Some(headquarters) = self.headquarters {
            provider.set_headquarters(headquarters)?;
        }
        if let Some(link) = self.wikilink {
            provider.set_wikilink(link)?;
        }
        Ok(provider)
    }
}

impl RocketRecord {
    fn into_entity(self, manufacturer: &LaunchServiceProvider) -> Result<Rocket, ValidationError> {
        let mut rocket = Rocket::new(
            required(self.name, "name")?,
            required(self.family_name, "familyName")?,
            required(self.variation_name, "variationName")?,
            required(self.country, "country")?,
            manufacturer,
        )?;
        if let Some(mass) = self.mass_to_leo {
            rocket.set_mass_to_leo(mass)?;
        }
        if let Some(mass) = self.mass_to_gto {
            rocket.set_mass_to_gto(mass)?;
        }
        rocket.set_mass_to_other(self.mass_to_other);
        if let Some(year) = self.first_year_flight {
            rocket.set_first_year_flight(year)?;
        }
        if let Some(year) = self.latest_year_flight {
            rocket.set_latest_year_flight(year)?;
        }
        if let Some(count) = self.no_launches {
            rocket.set_no_launches(count)?;
        }
        if let Some(link) = self.wikilink {
            rocket.set_wikilink(link)?;
        }
        Ok(rocket)
    }
}

impl LaunchRecord {
    fn into_entity(
        self,
        vehicle: &Rocket,
        provider: &LaunchServiceProvider,
    ) -> Result<Launch, ValidationError> {
        let mut launch = Launch::new(
            required(self.launch_date, "launchDate")?,
            vehicle,
            provider,
            required(self.launch_site, "launchSite")?,
            required(self.orbit, "orbit")?,
        )?;
        launch.set_payload(self.payload);
        if let Some(function) = self.function {
            launch.set_function(function)?;
        }
        if let Some(outcome) = self.launch_outcome {
            launch.set_launch_outcome(LaunchOutcome::from_str(&outcome)?);
        }
        if let Some(price) = self.price {
            launch.set_price(price);
        }
        if let Some(link) = self.wikilink {
            launch.set_wikilink(link)?;
        }
        Ok(launch)
    }
}

impl UserRecord {
    fn into_entity(self) -> Result<User, ValidationError> {
        let mut user = User::new(required(self.email, "email")?)?;
        if let Some(name) = self.first_name {
            user.set_first_name(name)?;
        }
        if let Some(name) = self.last_name {
            user.set_last_name(name)?;
        }
        if let Some(password) = self.password {
            user.set_password(password)?;
        }
        Ok(user)
    }
}

/// A parsed fixture document, ready to be loaded
#[derive(Debug, Default)]
pub struct FixtureLoader {
    document: FixtureDocument,
}

impl FixtureLoader {
    /// Parse a fixture from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, FixtureError> {
        let content = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse a fixture from JSON text
    pub fn from_json(content: &str) -> Result<Self, FixtureError> {
        let document: FixtureDocument = serde_json::from_str(content)?;
        Ok(Self { document })
    }

    /// Store every record in `repo`, providers first, then rockets,
    /// launches and users
    ///
    /// Stops at the first record that fails; records stored before it stay.
    pub fn load_into(self, repo: &InMemoryRepository) -> Result<LoadSummary, FixtureError> {
        let mut summary = LoadSummary::default();
        let FixtureDocument {
            launch_service_providers,
            rockets,
            launches,
            users,
        } = self.document;

        for (index, record) in launch_service_providers.into_iter().enumerate() {
            let invalid = invalid(EntityKind::LaunchServiceProvider, index);
            let provider = record.into_entity().map_err(invalid)?;
            repo.save_launch_service_provider(&provider)?;
            summary.launch_service_providers += 1;
        }

        for (index, record) in rockets.into_iter().enumerate() {
            let invalid = invalid(EntityKind::Rocket, index);
            let name = required(record.manufacturer.clone(), "manufacturer").map_err(invalid)?;
            let manufacturer = provider_named(repo, EntityKind::Rocket, &name)?;
            let rocket = record.into_entity(&manufacturer).map_err(invalid)?;
            repo.save_rocket(&rocket)?;
            summary.rockets += 1;
        }

        for (index, record) in launches.into_iter().enumerate() {
            let invalid = invalid(EntityKind::Launch, index);
            let vehicle_name = required(record.launch_vehicle.clone(), "launchVehicle").map_err(invalid)?;
            let provider_name =
                required(record.launch_service_provider.clone(), "launchServiceProvider").map_err(invalid)?;

            let mut vehicles = repo.find_rockets_by_name(&vehicle_name)?;
            vehicles.retain(|rocket| {
                record
                    .launch_vehicle_family
                    .as_deref()
                    .map_or(true, |family| rocket.family_name() == family)
                    && record
                        .launch_vehicle_variation
                        .as_deref()
                        .map_or(true, |variation| rocket.variation_name() == variation)
            });
            let vehicle = match vehicles.len() {
                0 => {
                    return Err(RepositoryError::MissingReference {
                        kind: EntityKind::Launch,
                        target: EntityKind::Rocket,
                        key: vehicle_name,
                    }
                    .into())
                }
                1 => vehicles.remove(0),
                matches => {
                    return Err(FixtureError::AmbiguousReference {
                        kind: EntityKind::Launch,
                        index,
                        target: EntityKind::Rocket,
                        name: vehicle_name,
                        matches,
                    })
                }
            };
            let provider = provider_named(repo, EntityKind::Launch, &provider_name)?;

            let launch = record.into_entity(&vehicle, &provider).map_err(invalid)?;
            repo.save_launch(&launch)?;
            summary.launches += 1;
        }

        for (index, record) in users.into_iter().enumerate() {
            let user = record
                .into_entity()
                .map_err(invalid(EntityKind::User, index))?;
            repo.save_user(&user)?;
            summary.users += 1;
        }

        tracing::info!(
            providers = summary.launch_service_providers,
            rockets = summary.rockets,
            launches = summary.launches,
            users = summary.users,
            "Fixture loaded"
        );
        Ok(summary)
    }
}

fn invalid(kind: EntityKind, index: usize) -> impl Fn(ValidationError) -> FixtureError + Copy {
    move |source| FixtureError::Invalid { kind, index, source }
}

fn provider_named(
    repo: &InMemoryRepository,
    kind: EntityKind,
    name: &str,
) -> Result<LaunchServiceProvider, RepositoryError> {
    repo.find_launch_service_provider_by_name(name)?
        .ok_or_else(|| RepositoryError::MissingReference {
            kind,
            target: EntityKind::LaunchServiceProvider,
            key: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rockets_domain::repository::snapshot_repository::Repository;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FIXTURE: &str = r#"{
        "launchServiceProviders": [
            { "name": "ULA", "yearFounded": 1990, "country": "USA", "headquarters": "Centennial, Colorado" },
            { "name": "SpaceX", "yearFounded": 2002, "country": "USA",
              "wikilink": "https://en.wikipedia.org/wiki/SpaceX" }
        ],
        "rockets": [
            { "name": "Atlas V", "familyName": "Atlas", "variationName": "401", "country": "USA",
              "manufacturer": "ULA", "massToLEO": "9797 kg", "firstYearFlight": 2002 },
            { "name": "Falcon 9", "familyName": "Falcon", "variationName": "FT", "country": "USA",
              "manufacturer": "SpaceX", "firstYearFlight": 2010, "latestYearFlight": 2018, "noLaunches": 60 }
        ],
        "launches": [
            { "launchDate": "2018-03-01T00:00:00Z", "launchVehicle": "Atlas V",
              "launchServiceProvider": "ULA", "launchSite": "Cape Canaveral", "orbit": "GTO",
              "payload": ["GOES-S"], "launchOutcome": "SUCCESSFUL", "price": 109000000 },
            { "launchDate": "2018-03-06T00:00:00Z", "launchVehicle": "Falcon 9",
              "launchServiceProvider": "SpaceX", "launchSite": "Cape Canaveral", "orbit": "GTO",
              "launchOutcome": "FAILED" }
        ],
        "users": [
            { "email": "ops@example.com", "firstName": "Grace" }
        ]
    }"#;

    #[test]
    fn test_load_fixture() {
        let repo = InMemoryRepository::new();
        let summary = FixtureLoader::from_json(FIXTURE).unwrap().load_into(&repo).unwrap();

        assert_eq!(
            summary,
            LoadSummary {
                launch_service_providers: 2,
                rockets: 2,
                launches: 2,
                users: 1,
            }
        );

        let atlas = repo.find_rockets_by_name("Atlas V").unwrap().remove(0);
        assert_eq!(atlas.mass_to_leo(), Some("9797 kg"));
        assert_eq!(atlas.launches().len(), 1);

        let launches = repo.launches().unwrap();
        assert_eq!(launches[0].price(), 109_000_000);
        assert!(launches[0].payload().contains("GOES-S"));
        assert!(launches[1].is_failed());

        let spacex = repo.find_launch_service_provider_by_name("SpaceX").unwrap().unwrap();
        assert!(spacex.wikilink().is_some());
        assert_eq!(spacex.rockets().len(), 1);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(FIXTURE.as_bytes()).unwrap();

        let repo = InMemoryRepository::new();
        FixtureLoader::from_file(file.path()).unwrap().load_into(&repo).unwrap();
        assert_eq!(repo.rockets().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let err = FixtureLoader::from_file(Path::new("/nonexistent/fixture.json")).unwrap_err();
        assert!(matches!(err, FixtureError::Io { .. }));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(FixtureLoader::from_json("{ not json"), Err(FixtureError::Json(_))));
        // Negative prices do not parse
        let doc = r#"{ "launches": [{ "price": -1 }] }"#;
        assert!(matches!(FixtureLoader::from_json(doc), Err(FixtureError::Json(_))));
    }

    #[test]
    fn test_empty_document() {
        let repo = InMemoryRepository::new();
        let summary = FixtureLoader::from_json("{}").unwrap().load_into(&repo).unwrap();
        assert_eq!(summary, LoadSummary::default());
    }

    #[test]
    fn test_missing_attribute() {
        let doc = r#"{ "launchServiceProviders": [{ "name": "ULA", "country": "USA" }] }"#;
        let err = FixtureLoader::from_json(doc)
            .unwrap()
            .load_into(&InMemoryRepository::new())
            .unwrap_err();
        match err {
            FixtureError::Invalid { kind, index, source } => {
                assert_eq!(kind, EntityKind::LaunchServiceProvider);
                assert_eq!(index, 0);
                assert_eq!(source, ValidationError::MissingField { field: "yearFounded" });
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_validation_applies() {
        let doc = r#"{
            "launchServiceProviders": [{ "name": "ULA", "yearFounded": 1990, "country": "USA" }],
            "rockets": [{ "name": "Atlas V", "familyName": "Atlas", "variationName": "401",
                          "country": "USA", "manufacturer": "ULA", "firstYearFlight": 1950 }]
        }"#;
        let err = FixtureLoader::from_json(doc)
            .unwrap()
            .load_into(&InMemoryRepository::new())
            .unwrap_err();
        assert!(matches!(
            err,
            FixtureError::Invalid {
                kind: EntityKind::Rocket,
                source: ValidationError::InvalidValue { field: "firstYearFlight", .. },
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_outcome() {
        let doc = FIXTURE.replace("\"FAILED\"", "\"SCRUBBED\"");
        let err = FixtureLoader::from_json(&doc)
            .unwrap()
            .load_into(&InMemoryRepository::new())
            .unwrap_err();
        assert!(matches!(
            err,
            FixtureError::Invalid {
                kind: EntityKind::Launch,
                index: 1,
                ..
            }
        ));
    }

    const SHARED_NAME: &str = r#"{
        "launchServiceProviders": [{ "name": "SpaceX", "yearFounded": 2002, "country": "USA" }],
        "rockets": [
            { "name": "Falcon 9", "familyName": "Falcon", "variationName": "v1.1",
              "country": "USA", "manufacturer": "SpaceX" },
            { "name": "Falcon 9", "familyName": "Falcon", "variationName": "FT",
              "country": "USA", "manufacturer": "SpaceX" }
        ],
        "launches": [
            { "launchDate": "2018-03-06T00:00:00Z", "launchVehicle": "Falcon 9", VARIATION
              "launchServiceProvider": "SpaceX", "launchSite": "Cape Canaveral", "orbit": "GTO" }
        ]
    }"#;

    #[test]
    fn test_shared_rocket_name_is_ambiguous() {
        let repo = InMemoryRepository::new();
        let err = FixtureLoader::from_json(&SHARED_NAME.replace("VARIATION", ""))
            .unwrap()
            .load_into(&repo)
            .unwrap_err();
        assert!(matches!(
            err,
            FixtureError::AmbiguousReference {
                kind: EntityKind::Launch,
                index: 0,
                target: EntityKind::Rocket,
                matches: 2,
                ..
            }
        ));
        assert!(repo.launches().unwrap().is_empty());
    }

    #[test]
    fn test_variation_picks_the_vehicle() {
        let repo = InMemoryRepository::new();
        let doc = SHARED_NAME.replace("VARIATION", r#""launchVehicleVariation": "FT","#);
        FixtureLoader::from_json(&doc).unwrap().load_into(&repo).unwrap();

        let rockets = repo.find_rockets_by_name("Falcon 9").unwrap();
        assert_eq!(rockets.len(), 2);
        assert!(rockets[0].launches().is_empty());
        assert_eq!(rockets[1].variation_name(), "FT");
        assert_eq!(rockets[1].launches().len(), 1);
        assert_eq!(repo.launches().unwrap()[0].launch_vehicle().variation_name, "FT");

        // A narrowing that matches nothing is a missing reference
        let doc = SHARED_NAME.replace("VARIATION", r#""launchVehicleVariation": "Block 5","#);
        let err = FixtureLoader::from_json(&doc)
            .unwrap()
            .load_into(&InMemoryRepository::new())
            .unwrap_err();
        assert!(matches!(
            err,
            FixtureError::Repository(RepositoryError::MissingReference { target: EntityKind::Rocket, .. })
        ));
    }

    #[test]
    fn test_unknown_reference() {
        let doc = r#"{
            "rockets": [{ "name": "Atlas V", "familyName": "Atlas", "variationName": "401",
                          "country": "USA", "manufacturer": "ULA" }]
        }"#;
        let err = FixtureLoader::from_json(doc)
            .unwrap()
            .load_into(&InMemoryRepository::new())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "rocket references a launch_service_provider that does not exist: ULA"
        );
    }
}
