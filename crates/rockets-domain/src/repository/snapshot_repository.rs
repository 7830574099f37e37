//! Snapshot Repository - Where the engine gets its data
//!
//! The engine only ever asks for a full collection of one kind of entity.
//! Each call returns a point-in-time copy: later writes to the store must
//! not show through a snapshot that was already handed out.

use std::sync::Arc;

use thiserror::Error;

use crate::model::entity::{Entity, EntityKind};
use crate::model::launch::Launch;
use crate::model::launch_service_provider::LaunchServiceProvider;
use crate::model::rocket::Rocket;
use crate::model::user::User;

/// Errors that can occur during repository operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// Nothing stored under this key
    #[error("{kind} not found: {key}")]
    NotFound { kind: EntityKind, key: String },

    /// The entity points at another entity that is not stored
    #[error("{kind} references a {target} that does not exist: {key}")]
    MissingReference {
        kind: EntityKind,
        target: EntityKind,
        key: String,
    },

    /// A uniqueness constraint would be broken
    #[error("{kind} already exists: {key}")]
    Duplicate { kind: EntityKind, key: String },

    /// The backing store failed
    #[error("persistence error: {message}")]
    Persistence { message: String },
}

/// Repository Trait
///
/// This is a PORT in hexagonal architecture.
/// The domain asks for snapshots; adapters decide where they come from.
///
/// Note: No async here. Every call hands back data already in memory.
pub trait Repository {
    fn rockets(&self) -> Result<Vec<Rocket>, RepositoryError>;

    fn launches(&self) -> Result<Vec<Launch>, RepositoryError>;

    fn launch_service_providers(&self) -> Result<Vec<LaunchServiceProvider>, RepositoryError>;

    fn users(&self) -> Result<Vec<User>, RepositoryError>;

    /// Load every entity of kind `E`
    fn load_all<E: Loadable>(&self) -> Result<Vec<E>, RepositoryError>
    where
        Self: Sized,
    {
        E::load_from(self)
    }
}

/// Entities a [`Repository`] can hand out as a snapshot
pub trait Loadable: Entity {
    fn load_from<R: Repository + ?Sized>(repo: &R) -> Result<Vec<Self>, RepositoryError>;
}

impl Loadable for Rocket {
    fn load_from<R: Repository + ?Sized>(repo: &R) -> Result<Vec<Self>, RepositoryError> {
        repo.rockets()
    }
}

impl Loadable for Launch {
    fn load_from<R: Repository + ?Sized>(repo: &R) -> Result<Vec<Self>, RepositoryError> {
        repo.launches()
    }
}

impl Loadable for LaunchServiceProvider {
    fn load_from<R: Repository + ?Sized>(repo: &R) -> Result<Vec<Self>, RepositoryError> {
        repo.launch_service_providers()
    }
}

impl Loadable for User {
    fn load_from<R: Repository + ?Sized>(repo: &R) -> Result<Vec<Self>, RepositoryError> {
        repo.users()
    }
}

impl<R: Repository + ?Sized> Repository for &R {
    fn rockets(&self) -> Result<Vec<Rocket>, RepositoryError> {
        (**self).rockets()
    }

    fn launches(&self) -> Result<Vec<Launch>, RepositoryError> {
        (**self).launches()
    }

    fn launch_service_providers(&self) -> Result<Vec<LaunchServiceProvider>, RepositoryError> {
        (**self).launch_service_providers()
    }

    fn users(&self) -> Result<Vec<User>, RepositoryError> {
        (**self).users()
    }
}

impl<R: Repository + ?Sized> Repository for Arc<R> {
    fn rockets(&self) -> Result<Vec<Rocket>, RepositoryError> {
        (**self).rockets()
    }

    fn launches(&self) -> Result<Vec<Launch>, RepositoryError> {
        (**self).launches()
    }

    fn launch_service_providers(&self) -> Result<Vec<LaunchServiceProvider>, RepositoryError> {
        (**self).launch_service_providers()
    }

    fn users(&self) -> Result<Vec<User>, RepositoryError> {
        (**self).users()
    }
}
