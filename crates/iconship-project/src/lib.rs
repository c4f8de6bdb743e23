mod config;
mod error;
mod project;

pub const CONFIG_FILE: &str = "release.toml";

pub use config::{ReleaseConfig, load_config, parse_config};
pub use error::ProjectError;
pub use project::{IconProject, discover_project};

pub type Result<T> = std::result::Result<T, ProjectError>;
