//! Persistence Adapters - Repository implementations
//!
//! These implement the repository port from rockets-domain.

pub mod in_memory;

pub use in_memory::InMemoryRepository;
