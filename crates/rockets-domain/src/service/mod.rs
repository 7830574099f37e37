//! Domain Services - Business logic that doesn't belong to a single entity
//!
//! The miner reads snapshots from a repository and answers ranked
//! questions about them. Clock and logger are its injected collaborators.

pub mod clock;
pub mod logger;
pub mod ranking;
pub mod rocket_miner;
