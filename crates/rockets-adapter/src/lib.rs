//! # Rockets Adapter Layer
//!
//! Outbound adapters for the domain's repository port (Hexagonal Architecture).
//!
//! ## Structure
//!
//! - `repository/` - Repository implementations
//! - `fixture` - Loads a JSON fixture document into a repository

pub mod fixture;
pub mod repository;

pub use fixture::{FixtureError, FixtureLoader, LoadSummary};
pub use repository::InMemoryRepository;
