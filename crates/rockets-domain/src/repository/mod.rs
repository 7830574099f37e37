//! Repository Traits - The "Ports" of Hexagonal Architecture
//!
//! These traits define WHAT the domain reads, but NOT where it comes
//! from. That's the adapter's job.
//!
//! ```text
//! Domain Layer          │  Adapter Layer
//! ──────────────────────┼────────────────────────
//! trait Repository      │  InMemoryRepository
//!   fn rockets()        │  FixtureLoader (JSON)
//!   fn launches()       │
//! ```

pub mod snapshot_repository;
