mod bump;
mod history;
mod prepare;
mod publish;
mod release;

use std::path::Path;

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use iconship_core::ReleaseType;

use crate::error::Result;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Bump every package manifest without touching the changelog or git
    Bump(BumpArgs),
    /// Bump versions and finalize the changelog for a later CI release
    Prepare(PrepareArgs),
    /// Run the full release pipeline, locally or in CI
    Release(ReleaseArgs),
    /// Create or refresh the hosted release for an existing tag and publish
    Publish(PublishArgs),
    /// Inspect or append the upstream update history
    #[command(subcommand)]
    History(HistoryCommand),
}

#[derive(Args)]
pub(crate) struct BumpArgs {
    /// Release type
    #[arg(value_enum)]
    pub release_type: Option<ReleaseType>,

    /// Release type (alternative to the positional argument)
    #[arg(long = "type", value_enum, conflicts_with = "release_type")]
    pub type_flag: Option<ReleaseType>,
}

impl BumpArgs {
    fn requested(&self) -> ReleaseType {
        self.release_type.or(self.type_flag).unwrap_or_default()
    }
}

#[derive(Args)]
pub(crate) struct PrepareArgs {
    #[arg(long = "type", value_enum, default_value_t = ReleaseType::Auto)]
    pub release_type: ReleaseType,

    /// Print every change without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub(crate) struct ReleaseArgs {
    /// Release type; only `auto` is accepted with --ci
    #[arg(long = "type", value_enum, default_value_t = ReleaseType::Auto)]
    pub release_type: ReleaseType,

    /// Print every command without running mutating ones
    #[arg(long)]
    pub dry_run: bool,

    /// Ship the version a previous `prepare` committed
    #[arg(long)]
    pub ci: bool,

    /// Branch or tag the CI run was triggered for
    #[arg(long, env = "GITHUB_REF_NAME", hide = true)]
    pub ref_name: Option<String>,
}

#[derive(Args)]
pub(crate) struct PublishArgs {
    /// Release tag, e.g. v1.2.3
    #[arg(long)]
    pub tag: String,

    /// Print the commands without running them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub(crate) enum HistoryCommand {
    /// Show the latest sync, or every change since a timestamp
    Show {
        /// RFC 3339 timestamp, e.g. 2024-06-01T00:00:00Z
        #[arg(long, value_parser = parse_timestamp)]
        since: Option<DateTime<Utc>>,
    },
    /// Record an upstream sync and mark the manifests unreleased
    Record(RecordArgs),
}

#[derive(Args)]
pub(crate) struct RecordArgs {
    /// Upstream package the icons were synced from
    #[arg(long)]
    pub package: Option<String>,

    /// Upstream version before the sync
    #[arg(long)]
    pub from: Option<String>,

    /// Upstream version after the sync
    #[arg(long)]
    pub to: Option<String>,

    #[arg(long, value_delimiter = ',')]
    pub added: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub updated: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub removed: Vec<String>,

    /// Sync time (default: now)
    #[arg(long, value_parser = parse_timestamp)]
    pub timestamp: Option<DateTime<Utc>>,
}

fn parse_timestamp(value: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|ts| ts.with_timezone(&Utc))
}

impl Commands {
    pub(crate) fn execute(self, start_path: &Path) -> Result<()> {
        match self {
            Self::Bump(args) => bump::run(&args, start_path),
            Self::Prepare(args) => prepare::run(&args, start_path),
            Self::Release(args) => release::run(args, start_path),
            Self::Publish(args) => publish::run(args, start_path),
            Self::History(HistoryCommand::Show { since }) => history::show(since, start_path),
            Self::History(HistoryCommand::Record(args)) => history::record(args, start_path),
        }
    }
}
