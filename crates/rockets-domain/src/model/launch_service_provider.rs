//! LaunchServiceProvider - The company that builds and flies rockets
//!
//! An LSP owns the rockets it manufactures for modelling purposes, but
//! the ownership is recorded as a set of rocket keys. Deleting an LSP
//! never deletes its rockets.

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use super::entity::{Entity, EntityKind, EntityMeta};
use super::error::{non_blank, ValidationError};
use super::rocket::{Rocket, RocketKey};

/// Business key of a launch service provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchServiceProviderKey {
    pub name: String,
    pub year_founded: i32,
    pub country: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchServiceProvider {
    #[serde(flatten)]
    meta: EntityMeta,
    name: String,
    year_founded: i32,
    country: String,
    headquarters: Option<String>,
    #[serde(skip)]
    rockets: BTreeSet<RocketKey>,
}

impl LaunchServiceProvider {
    pub fn new(
        name: impl Into<String>,
        year_founded: i32,
        country: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            meta: EntityMeta::default(),
            name: non_blank("name", name)?,
            year_founded,
            country: non_blank("country", country)?,
            headquarters: None,
            rockets: BTreeSet::new(),
        })
    }

    // ========== Getters ==========

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn year_founded(&self) -> i32 {
        self.year_founded
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn headquarters(&self) -> Option<&str> {
        self.headquarters.as_deref()
    }

    /// Keys of the rockets this provider manufactures
    pub fn rockets(&self) -> &BTreeSet<RocketKey> {
        &self.rockets
    }

    // ========== Setters ==========

    pub fn set_country(&mut self, country: impl Into<String>) -> Result<(), ValidationError> {
        self.country = non_blank("country", country)?;
        Ok(())
    }

    pub fn set_headquarters(&mut self, headquarters: impl Into<String>) -> Result<(), ValidationError> {
        self.headquarters = Some(non_blank("headquarters", headquarters)?);
        Ok(())
    }

    /// Record a rocket as manufactured by this provider
    ///
    /// The rocket must already name this provider as its manufacturer.
    pub fn add_rocket(&mut self, rocket: &Rocket) -> Result<(), ValidationError> {
        if rocket.manufacturer() != &self.key() {
            return Err(ValidationError::inconsistent(
                "rockets",
                format!(
                    "rocket '{}' is manufactured by '{}', not '{}'",
                    rocket.name(),
                    rocket.manufacturer().name,
                    self.name
                ),
            ));
        }
        self.rockets.insert(rocket.key());
        Ok(())
    }

    /// Forget a rocket; returns whether it was recorded
    pub fn remove_rocket(&mut self, key: &RocketKey) -> bool {
        self.rockets.remove(key)
    }
}

impl Entity for LaunchServiceProvider {
    const KIND: EntityKind = EntityKind::LaunchServiceProvider;
    type Key = LaunchServiceProviderKey;

    fn key(&self) -> LaunchServiceProviderKey {
        LaunchServiceProviderKey {
            name: self.name.clone(),
            year_founded: self.year_founded,
            country: self.country.clone(),
        }
    }

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }
}

impl PartialEq for LaunchServiceProvider {
    fn eq(&self, other: &Self) -> bool {
        // Entity equality: same business key = same provider
        self.key() == other.key()
    }
}

impl Eq for LaunchServiceProvider {}

impl Hash for LaunchServiceProvider {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}
