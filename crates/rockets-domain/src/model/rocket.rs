//! Rocket - A launch vehicle
//!
//! A Rocket is identified by its full name (name, family, variation),
//! its country and its manufacturer. It references its manufacturer and
//! its launches by business key, so deleting a rocket never deletes
//! either of them.

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use super::entity::{Entity, EntityKind, EntityMeta};
use super::error::{non_blank, ValidationError};
use super::launch::{Launch, LaunchKey};
use super::launch_service_provider::{LaunchServiceProvider, LaunchServiceProviderKey};

/// Year of the first orbital launch; no rocket flew before it
pub const FIRST_ORBITAL_FLIGHT_YEAR: i32 = 1957;

/// Business key of a rocket
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RocketKey {
    pub name: String,
    pub family_name: String,
    pub variation_name: String,
    pub country: String,
    pub manufacturer: LaunchServiceProviderKey,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rocket {
    #[serde(flatten)]
    meta: EntityMeta,
    name: String,
    family_name: String,
    variation_name: String,
    country: String,
    manufacturer: LaunchServiceProviderKey,
    mass_to_leo: Option<String>,
    mass_to_gto: Option<String>,
    mass_to_other: Option<String>,
    first_year_flight: Option<i32>,
    latest_year_flight: Option<i32>,
    no_launches: u32,
    #[serde(skip)]
    launches: BTreeSet<LaunchKey>,
}

impl Rocket {
    pub fn new(
        name: impl Into<String>,
        family_name: impl Into<String>,
        variation_name: impl Into<String>,
        country: impl Into<String>,
        manufacturer: &LaunchServiceProvider,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            meta: EntityMeta::default(),
            name: non_blank("name", name)?,
            family_name: non_blank("familyName", family_name)?,
            variation_name: non_blank("variationName", variation_name)?,
            country: non_blank("country", country)?,
            manufacturer: manufacturer.key(),
            mass_to_leo: None,
            mass_to_gto: None,
            mass_to_other: None,
            first_year_flight: None,
            latest_year_flight: None,
            no_launches: 0,
            launches: BTreeSet::new(),
        })
    }

    // ========== Getters ==========

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn variation_name(&self) -> &str {
        &self.variation_name
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    /// Key of the provider that manufactures this rocket
    pub fn manufacturer(&self) -> &LaunchServiceProviderKey {
        &self.manufacturer
    }

    pub fn mass_to_leo(&self) -> Option<&str> {
        self.mass_to_leo.as_deref()
    }

    pub fn mass_to_gto(&self) -> Option<&str> {
        self.mass_to_gto.as_deref()
    }

    pub fn mass_to_other(&self) -> Option<&str> {
        self.mass_to_other.as_deref()
    }

    pub fn first_year_flight(&self) -> Option<i32> {
        self.first_year_flight
    }

    pub fn latest_year_flight(&self) -> Option<i32> {
        self.latest_year_flight
    }

    pub fn no_launches(&self) -> u32 {
        self.no_launches
    }

    /// Keys of the launches this rocket flew
    pub fn launches(&self) -> &BTreeSet<LaunchKey> {
        &self.launches
    }

    // ========== Setters ==========

    pub fn set_country(&mut self, country: impl Into<String>) -> Result<(), ValidationError> {
        self.country = non_blank("country", country)?;
        Ok(())
    }

    pub fn set_mass_to_leo(&mut self, mass: impl Into<String>) -> Result<(), ValidationError> {
        self.mass_to_leo = Some(non_blank("massToLEO", mass)?);
        Ok(())
    }

    pub fn set_mass_to_gto(&mut self, mass: impl Into<String>) -> Result<(), ValidationError> {
        self.mass_to_gto = Some(non_blank("massToGTO", mass)?);
        Ok(())
    }

    pub fn set_mass_to_other(&mut self, mass: Option<String>) {
        self.mass_to_other = mass;
    }

    pub fn set_first_year_flight(&mut self, year: i32) -> Result<(), ValidationError> {
        check_flight_year("firstYearFlight", year)?;
        if let Some(latest) = self.latest_year_flight {
            if year > latest {
                return Err(ValidationError::inconsistent(
                    "firstYearFlight",
                    format!("{} is after the latest flight year {}", year, latest),
                ));
            }
        }
        self.first_year_flight = Some(year);
        Ok(())
    }

    pub fn set_latest_year_flight(&mut self, year: i32) -> Result<(), ValidationError> {
        check_flight_year("latestYearFlight", year)?;
        match self.first_year_flight {
            None => Err(ValidationError::inconsistent(
                "latestYearFlight",
                "the first flight year must be set first",
            )),
            Some(first) if year < first => Err(ValidationError::inconsistent(
                "latestYearFlight",
                format!("{} is before the first flight year {}", year, first),
            )),
            Some(_) if self.no_launches == 1 => Err(ValidationError::inconsistent(
                "latestYearFlight",
                "a rocket with a single recorded launch has no separate latest flight year",
            )),
            Some(_) => {
                self.latest_year_flight = Some(year);
                Ok(())
            }
        }
    }

    /// Set the number of launches flown
    ///
    /// A rocket with a first flight has flown at least once, and one with
    /// a latest flight year on record has flown at least twice.
    pub fn set_no_launches(&mut self, no_launches: u32) -> Result<(), ValidationError> {
        if self.first_year_flight.is_none() {
            return Err(ValidationError::inconsistent(
                "noLaunches",
                "the first flight year must be set first",
            ));
        }
        if no_launches < 1 {
            return Err(ValidationError::inconsistent(
                "noLaunches",
                "a rocket with a first flight has at least one launch",
            ));
        }
        if self.latest_year_flight.is_some() && no_launches < 2 {
            return Err(ValidationError::inconsistent(
                "noLaunches",
                "a rocket with a latest flight year has at least two launches",
            ));
        }
        self.no_launches = no_launches;
        Ok(())
    }

    /// Record a launch flown by this rocket
    pub fn add_launch(&mut self, launch: &Launch) -> Result<(), ValidationError> {
        if launch.launch_vehicle() != &self.key() {
            return Err(ValidationError::inconsistent(
                "launches",
                format!(
                    "launch on {} was flown by '{}', not '{}'",
                    launch.launch_date().date_naive(),
                    launch.launch_vehicle().name,
                    self.name
                ),
            ));
        }
        self.launches.insert(launch.key());
        Ok(())
    }

    /// Forget a launch; returns whether it was recorded
    pub fn remove_launch(&mut self, key: &LaunchKey) -> bool {
        self.launches.remove(key)
    }
}

fn check_flight_year(field: &'static str, year: i32) -> Result<(), ValidationError> {
    if year < FIRST_ORBITAL_FLIGHT_YEAR {
        return Err(ValidationError::invalid(
            field,
            format!("{} is before {}", year, FIRST_ORBITAL_FLIGHT_YEAR),
        ));
    }
    Ok(())
}

impl Entity for Rocket {
    const KIND: EntityKind = EntityKind::Rocket;
    type Key = RocketKey;

    fn key(&self) -> RocketKey {
        RocketKey {
            name: self.name.clone(),
            family_name: self.family_name.clone(),
            variation_name: self.variation_name.clone(),
            country: self.country.clone(),
            manufacturer: self.manufacturer.clone(),
        }
    }

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }
}

impl PartialEq for Rocket {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Rocket {}

impl Hash for Rocket {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::HashSet;

    fn monash() -> LaunchServiceProvider {
        LaunchServiceProvider::new("Monash", 1984, "Australia").unwrap()
    }

    fn ariane() -> Rocket {
        Rocket::new("5", "Ariane", "ECA", "China", &monash()).unwrap()
    }

    #[test]
    fn test_same_full_name_same_rocket() {
        let a = ariane();
        let b = Rocket::new("5", "Ariane", "ECA", "China", &monash()).unwrap();
        assert_eq!(a, b);

        let set: HashSet<Rocket> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_each_key_field_distinguishes() {
        let rmit = LaunchServiceProvider::new("RMIT", 1984, "Australia").unwrap();
        let base = ariane();

        assert_ne!(base, Rocket::new("5", "Ariane", "ECA", "China", &rmit).unwrap());
        assert_ne!(base, Rocket::new("4", "Ariane", "ECA", "China", &monash()).unwrap());
        assert_ne!(base, Rocket::new("5", "Apollo", "ECA", "China", &monash()).unwrap());
        assert_ne!(base, Rocket::new("5", "Ariane", "ES", "China", &monash()).unwrap());
        assert_ne!(base, Rocket::new("5", "Ariane", "ECA", "America", &monash()).unwrap());
    }

    #[test]
    fn test_blank_names_rejected() {
        let lsp = monash();
        let cases = [
            (Rocket::new("", "Ariane", "ECA", "China", &lsp), "name"),
            (Rocket::new("5", "", "ECA", "China", &lsp), "familyName"),
            (Rocket::new("5", "Ariane", " ", "China", &lsp), "variationName"),
            (Rocket::new("5", "Ariane", "ECA", "", &lsp), "country"),
        ];
        for (result, field) in cases {
            assert_eq!(result.unwrap_err(), ValidationError::EmptyField { field });
        }
    }

    #[test]
    fn test_mass_setters_reject_blank() {
        let mut rocket = ariane();
        assert!(rocket.set_mass_to_leo("").is_err());
        assert!(rocket.set_mass_to_gto("").is_err());

        rocket.set_mass_to_leo("21000 kg").unwrap();
        rocket.set_mass_to_other(Some("n/a".to_string()));
        assert_eq!(rocket.mass_to_leo(), Some("21000 kg"));
        assert_eq!(rocket.mass_to_other(), Some("n/a"));
    }

    #[test]
    fn test_first_year_flight_range() {
        let mut rocket = ariane();
        assert!(matches!(
            rocket.set_first_year_flight(1956),
            Err(ValidationError::InvalidValue { .. })
        ));
        rocket.set_first_year_flight(1957).unwrap();
        assert_eq!(rocket.first_year_flight(), Some(1957));
    }

    #[test]
    fn test_latest_year_needs_first_year() {
        let mut rocket = ariane();
        assert!(matches!(
            rocket.set_latest_year_flight(2000),
            Err(ValidationError::InconsistentState { .. })
        ));

        rocket.set_first_year_flight(1990).unwrap();
        assert!(matches!(
            rocket.set_latest_year_flight(1989),
            Err(ValidationError::InconsistentState { .. })
        ));
        rocket.set_latest_year_flight(2018).unwrap();

        // First year cannot move past the latest one afterwards
        assert!(rocket.set_first_year_flight(2019).is_err());
    }

    #[test]
    fn test_no_launches_consistency() {
        let mut rocket = ariane();
        assert!(rocket.set_no_launches(1).is_err());

        rocket.set_first_year_flight(1990).unwrap();
        assert!(rocket.set_no_launches(0).is_err());
        rocket.set_no_launches(1).unwrap();
        assert_eq!(rocket.no_launches(), 1);

        rocket.set_no_launches(3).unwrap();
        rocket.set_latest_year_flight(1995).unwrap();
        assert!(matches!(
            rocket.set_no_launches(1),
            Err(ValidationError::InconsistentState { field: "noLaunches", .. })
        ));
        rocket.set_no_launches(2).unwrap();
    }

    #[test]
    fn test_latest_year_needs_more_than_one_launch() {
        let mut rocket = ariane();
        rocket.set_first_year_flight(1990).unwrap();
        rocket.set_no_launches(1).unwrap();

        assert!(matches!(
            rocket.set_latest_year_flight(1995),
            Err(ValidationError::InconsistentState { field: "latestYearFlight", .. })
        ));
        assert_eq!(rocket.latest_year_flight(), None);

        rocket.set_no_launches(2).unwrap();
        rocket.set_latest_year_flight(1995).unwrap();
        assert_eq!(rocket.latest_year_flight(), Some(1995));
        assert_eq!(rocket.no_launches(), 2);
    }

    #[test]
    fn test_add_launch_checks_vehicle() {
        let lsp = monash();
        let mut rocket = ariane();
        let other = Rocket::new("6", "Ariane", "ECA", "China", &lsp).unwrap();
        let date = Utc.with_ymd_and_hms(2017, 3, 1, 0, 0, 0).unwrap();

        let own = Launch::new(date, &rocket, &lsp, "Kourou", "LEO").unwrap();
        let foreign = Launch::new(date, &other, &lsp, "Kourou", "LEO").unwrap();

        rocket.add_launch(&own).unwrap();
        rocket.add_launch(&own).unwrap();
        assert_eq!(rocket.launches().len(), 1);
        assert!(rocket.add_launch(&foreign).is_err());

        assert!(rocket.remove_launch(&own.key()));
        assert!(!rocket.remove_launch(&own.key()));
    }
}
