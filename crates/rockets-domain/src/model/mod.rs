//! Domain Models - The vocabulary of launch history
//!
//! Entities compare by business key, never by storage identity, and
//! reference each other by key rather than by embedded object.

pub mod entity;
pub mod error;
pub mod launch;
pub mod launch_service_provider;
pub mod rocket;
pub mod user;
