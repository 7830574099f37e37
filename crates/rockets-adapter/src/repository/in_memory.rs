//! In-Memory Repository Implementation
//!
//! Every table keeps insertion order, so snapshots come back in the order
//! entities were first saved. Links between entities (a provider's rockets,
//! a rocket's launches) are maintained here on save and delete.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rockets_domain::model::entity::{Entity, EntityId, EntityKind};
use rockets_domain::model::launch::{Launch, LaunchKey};
use rockets_domain::model::launch_service_provider::{LaunchServiceProvider, LaunchServiceProviderKey};
use rockets_domain::model::rocket::{Rocket, RocketKey};
use rockets_domain::model::user::User;
use rockets_domain::repository::snapshot_repository::{Repository, RepositoryError};

/// One entity kind, in insertion order
#[derive(Debug, Clone)]
struct Table<E> {
    rows: Vec<E>,
}

impl<E> Default for Table<E> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<E: Entity> Table<E> {
    fn position(&self, key: &E::Key) -> Option<usize> {
        self.rows.iter().position(|row| &row.key() == key)
    }

    fn get(&self, key: &E::Key) -> Option<&E> {
        self.position(key).map(|i| &self.rows[i])
    }

    fn get_mut(&mut self, key: &E::Key) -> Option<&mut E> {
        self.position(key).map(move |i| &mut self.rows[i])
    }

    fn contains(&self, key: &E::Key) -> bool {
        self.position(key).is_some()
    }

    /// Insert or replace by business key
    ///
    /// A replaced row hands its id on; a new row gets a fresh one unless
    /// the entity already carries an id.
    fn upsert(&mut self, mut entity: E) -> E {
        match self.position(&entity.key()) {
            Some(i) => {
                if let Some(id) = self.rows[i].id().or(entity.id()) {
                    entity.assign_id(id);
                }
                self.rows[i] = entity.clone();
            }
            None => {
                if entity.id().is_none() {
                    entity.assign_id(EntityId::generate());
                }
                self.rows.push(entity.clone());
            }
        }
        entity
    }

    fn remove(&mut self, key: &E::Key) -> Option<E> {
        self.position(key).map(|i| self.rows.remove(i))
    }
}

#[derive(Debug, Clone, Default)]
struct Store {
    providers: Table<LaunchServiceProvider>,
    rockets: Table<Rocket>,
    launches: Table<Launch>,
    users: Table<User>,
}

/// In-memory store for all four entity kinds
///
/// Thread-safe implementation using RwLock. Clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Store>, RepositoryError> {
        self.store.read().map_err(|_| RepositoryError::Persistence {
            message: "Failed to acquire read lock".to_string(),
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Store>, RepositoryError> {
        self.store.write().map_err(|_| RepositoryError::Persistence {
            message: "Failed to acquire write lock".to_string(),
        })
    }

    // ========== Launch service providers ==========

    /// Store a provider, relinking any rockets it already manufactures
    pub fn save_launch_service_provider(
        &self,
        provider: &LaunchServiceProvider,
    ) -> Result<LaunchServiceProvider, RepositoryError> {
        let mut store = self.write()?;
        let mut provider = provider.clone();
        let key = provider.key();
        for rocket in store.rockets.rows.iter().filter(|r| r.manufacturer() == &key) {
            provider
                .add_rocket(rocket)
                .map_err(|e| persistence(e.to_string()))?;
        }
        Ok(store.providers.upsert(provider))
    }

    pub fn find_launch_service_provider(
        &self,
        key: &LaunchServiceProviderKey,
    ) -> Result<Option<LaunchServiceProvider>, RepositoryError> {
        Ok(self.read()?.providers.get(key).cloned())
    }

    /// First provider saved under `name`
    pub fn find_launch_service_provider_by_name(
        &self,
        name: &str,
    ) -> Result<Option<LaunchServiceProvider>, RepositoryError> {
        Ok(self
            .read()?
            .providers
            .rows
            .iter()
            .find(|p| p.name() == name)
            .cloned())
    }

    /// Remove a provider; the rockets it manufactures stay stored
    pub fn delete_launch_service_provider(
        &self,
        key: &LaunchServiceProviderKey,
    ) -> Result<(), RepositoryError> {
        self.write()?
            .providers
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| not_found(EntityKind::LaunchServiceProvider, &key.name))
    }

    // ========== Rockets ==========

    /// Store a rocket and link it into its manufacturer
    ///
    /// The manufacturer must be stored first.
    pub fn save_rocket(&self, rocket: &Rocket) -> Result<Rocket, RepositoryError> {
        let mut store = self.write()?;
        let key = rocket.key();
        if !store.providers.contains(rocket.manufacturer()) {
            return Err(RepositoryError::MissingReference {
                kind: EntityKind::Rocket,
                target: EntityKind::LaunchServiceProvider,
                key: rocket.manufacturer().name.clone(),
            });
        }

        let mut rocket = rocket.clone();
        for launch in store.launches.rows.iter().filter(|l| l.launch_vehicle() == &key) {
            rocket
                .add_launch(launch)
                .map_err(|e| persistence(e.to_string()))?;
        }
        let saved = store.rockets.upsert(rocket);

        if let Some(manufacturer) = store.providers.get_mut(saved.manufacturer()) {
            manufacturer
                .add_rocket(&saved)
                .map_err(|e| persistence(e.to_string()))?;
        }
        Ok(saved)
    }

    pub fn find_rocket(&self, key: &RocketKey) -> Result<Option<Rocket>, RepositoryError> {
        Ok(self.read()?.rockets.get(key).cloned())
    }

    /// Every rocket saved under `name`, in insertion order
    pub fn find_rockets_by_name(&self, name: &str) -> Result<Vec<Rocket>, RepositoryError> {
        Ok(self
            .read()?
            .rockets
            .rows
            .iter()
            .filter(|r| r.name() == name)
            .cloned()
            .collect())
    }

    /// Remove a rocket and unlink it from its manufacturer
    ///
    /// Launches flown by the rocket stay stored.
    pub fn delete_rocket(&self, key: &RocketKey) -> Result<(), RepositoryError> {
        let mut store = self.write()?;
        let removed = store
            .rockets
            .remove(key)
            .ok_or_else(|| not_found(EntityKind::Rocket, &key.name))?;
        if let Some(manufacturer) = store.providers.get_mut(removed.manufacturer()) {
            manufacturer.remove_rocket(key);
        }
        Ok(())
    }

    // ========== Launches ==========

    /// Store a launch and link it into its vehicle
    ///
    /// The vehicle and the operating provider must be stored first.
    pub fn save_launch(&self, launch: &Launch) -> Result<Launch, RepositoryError> {
        let mut store = self.write()?;
        if !store.rockets.contains(launch.launch_vehicle()) {
            return Err(RepositoryError::MissingReference {
                kind: EntityKind::Launch,
                target: EntityKind::Rocket,
                key: launch.launch_vehicle().name.clone(),
            });
        }
        if !store.providers.contains(launch.launch_service_provider()) {
            return Err(RepositoryError::MissingReference {
                kind: EntityKind::Launch,
                target: EntityKind::LaunchServiceProvider,
                key: launch.launch_service_provider().name.clone(),
            });
        }

        let saved = store.launches.upsert(launch.clone());
        if let Some(vehicle) = store.rockets.get_mut(saved.launch_vehicle()) {
            vehicle
                .add_launch(&saved)
                .map_err(|e| persistence(e.to_string()))?;
        }
        Ok(saved)
    }

    pub fn find_launch(&self, key: &LaunchKey) -> Result<Option<Launch>, RepositoryError> {
        Ok(self.read()?.launches.get(key).cloned())
    }

    /// Remove a launch and unlink it from its vehicle
    pub fn delete_launch(&self, key: &LaunchKey) -> Result<(), RepositoryError> {
        let mut store = self.write()?;
        store
            .launches
            .remove(key)
            .ok_or_else(|| not_found(EntityKind::Launch, &key.launch_vehicle.name))?;
        if let Some(vehicle) = store.rockets.get_mut(&key.launch_vehicle) {
            vehicle.remove_launch(key);
        }
        Ok(())
    }

    // ========== Users ==========

    /// Store a user; an email belongs to at most one user id
    pub fn save_user(&self, user: &User) -> Result<User, RepositoryError> {
        let mut store = self.write()?;
        if let Some(existing) = store.users.get(&user.key()) {
            if existing.id() != user.id() {
                return Err(RepositoryError::Duplicate {
                    kind: EntityKind::User,
                    key: user.email().to_string(),
                });
            }
        }

        // A stored user whose email changed is replaced, not duplicated
        if let Some(id) = user.id() {
            store.users.rows.retain(|u| u.id() != Some(id));
        }
        Ok(store.users.upsert(user.clone()))
    }

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self.read()?.users.rows.iter().find(|u| u.email() == email).cloned())
    }

    pub fn delete_user(&self, email: &str) -> Result<(), RepositoryError> {
        let mut store = self.write()?;
        let before = store.users.rows.len();
        store.users.rows.retain(|u| u.email() != email);
        if store.users.rows.len() == before {
            return Err(not_found(EntityKind::User, email));
        }
        Ok(())
    }

    // ========== Counts ==========

    pub fn count(&self, kind: EntityKind) -> Result<usize, RepositoryError> {
        let store = self.read()?;
        Ok(match kind {
            EntityKind::Rocket => store.rockets.rows.len(),
            EntityKind::Launch => store.launches.rows.len(),
            EntityKind::LaunchServiceProvider => store.providers.rows.len(),
            EntityKind::User => store.users.rows.len(),
        })
    }
}

impl Repository for InMemoryRepository {
    fn rockets(&self) -> Result<Vec<Rocket>, RepositoryError> {
        Ok(self.read()?.rockets.rows.clone())
    }

    fn launches(&self) -> Result<Vec<Launch>, RepositoryError> {
        Ok(self.read()?.launches.rows.clone())
    }

    fn launch_service_providers(&self) -> Result<Vec<LaunchServiceProvider>, RepositoryError> {
        Ok(self.read()?.providers.rows.clone())
    }

    fn users(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.read()?.users.rows.clone())
    }
}

fn not_found(kind: EntityKind, key: &str) -> RepositoryError {
    RepositoryError::NotFound {
        kind,
        key: key.to_string(),
    }
}

fn persistence(message: String) -> RepositoryError {
    RepositoryError::Persistence { message }
}
