//! # Rockets Domain Layer
//!
//! Entities, the repository port and the ranking engine. No I/O happens
//! here: adapters fill a [`Repository`], the miner reads it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Domain Layer (This Crate)                     │
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │  model/     - Entities, business keys, validation           ││
//! │  │  repository/- Trait definitions (not implementations)       ││
//! │  │  service/   - RocketMiner and its ranking helpers           ││
//! │  └─────────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Entities refer to one another by business key, never by pointer.
//! Resolving a key is a lookup in the snapshot that holds the target.

pub mod model;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use model::{
    entity::{Entity, EntityId, EntityKind, Wikilink},
    error::ValidationError,
    launch::{Launch, LaunchKey, LaunchOutcome},
    launch_service_provider::{LaunchServiceProvider, LaunchServiceProviderKey},
    rocket::{Rocket, RocketKey, FIRST_ORBITAL_FLIGHT_YEAR},
    user::{User, UserKey},
};

pub use repository::snapshot_repository::{Loadable, Repository, RepositoryError};

pub use service::{
    clock::{Clock, FixedClock, SystemClock},
    logger::{Logger, NullLogger, TracingLogger},
    ranking::TiePolicy,
    rocket_miner::{MinerError, RocketMiner},
};
