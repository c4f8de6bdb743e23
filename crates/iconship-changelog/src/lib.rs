mod changelog;
mod error;
mod forge;
mod notes;

pub use changelog::{Changelog, FinalizeRequest};
pub use error::ChangelogError;
pub use forge::{Forge, RepositoryInfo};
pub use notes::extract_release_notes;

pub type Result<T> = std::result::Result<T, ChangelogError>;
