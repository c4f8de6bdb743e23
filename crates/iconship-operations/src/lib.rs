//! Release operations for icon monorepos.
//!
//! Operations talk to the outside world only through the provider traits in
//! [`traits`]; [`providers`] holds the filesystem, git and CLI-backed
//! implementations used by the `iconship` binary.

mod error;
pub mod operations;
pub mod providers;
pub mod traits;
mod types;

#[cfg(test)]
pub mod mocks;

pub use error::{OperationError, Result};
pub use types::{ReleaseMode, ReleaseState};
