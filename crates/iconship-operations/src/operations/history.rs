use std::path::Path;

use chrono::{DateTime, Utc};
use iconship_core::{ChangeCounts, ManifestVersion};
use iconship_history::{
    ContinuityGap, CumulativeChanges, HistoryEntry, HistoryError, HistoryLedger, IconChange,
    SaveReport,
};
use iconship_project::IconProject;
use iconship_version::next_unreleased;
use tracing::{info, warn};

use super::version_store::VersionStore;
use crate::providers::Providers;
use crate::Result;

/// Logs a failed mirror write; the primary ledger is authoritative.
pub(crate) fn warn_on_mirror_failure(report: &SaveReport) {
    if let Some(err) = &report.mirror_error {
        warn!(error = %err, "failed to write history mirror");
    }
}

/// One upstream sync to record.
#[derive(Debug, Clone)]
pub struct SyncInput {
    pub timestamp: DateTime<Utc>,
    pub upstream_package_name: Option<String>,
    pub upstream_version_from: Option<String>,
    pub upstream_version_to: Option<String>,
    pub added: Vec<String>,
    pub updated: Vec<String>,
    pub removed: Vec<String>,
}

impl SyncInput {
    fn into_entry(self) -> HistoryEntry {
        let names = |list: Vec<String>| -> Vec<IconChange> {
            list.iter().map(|n| IconChange::from(n.as_str())).collect()
        };
        let mut entry = HistoryEntry::new(self.timestamp);
        entry.upstream_package_name = self.upstream_package_name;
        entry.upstream_version_from = self.upstream_version_from;
        entry.upstream_version_to = self.upstream_version_to;
        entry.added = names(self.added);
        entry.updated = names(self.updated);
        entry.removed = names(self.removed);
        entry
    }
}

#[derive(Debug, Clone)]
pub struct SyncOutput {
    /// `false` when the sync changed no icons and nothing was written.
    pub recorded: bool,
    /// Version the manifests carry after the sync.
    pub marked_version: ManifestVersion,
    pub manifests_updated: usize,
    pub counts: ChangeCounts,
    /// Gap between the new entry and the one before it, if any.
    pub gap: Option<ContinuityGap>,
}

/// Records an upstream sync in the ledger and marks the manifests unreleased.
pub struct RecordSyncOperation {
    providers: Providers,
}

impl RecordSyncOperation {
    #[must_use]
    pub fn new(providers: Providers) -> Self {
        Self { providers }
    }

    /// A sync without added, updated or removed icons leaves the manifests
    /// and the ledger untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if a manifest or the ledger cannot be updated.
    pub fn execute(&self, start_path: &Path, input: SyncInput) -> Result<SyncOutput> {
        let mut entry = input.into_entry();
        let project = self.providers.project.discover_project(start_path)?;
        let store = VersionStore::new(&project, self.providers.manifests.as_ref());
        let current = store.read_current()?;

        if !entry.has_changes() {
            info!("no icon changes detected, skipping history update");
            return Ok(SyncOutput {
                recorded: false,
                marked_version: current.version,
                manifests_updated: 0,
                counts: ChangeCounts::default(),
                gap: None,
            });
        }

        let marked_version = if current.clears_marker() {
            current.version.clone()
        } else {
            next_unreleased(&current.version)
        };
        let manifests_updated = if marked_version == current.version && current.is_aligned() {
            0
        } else {
            store.write_all(&marked_version)?
        };

        entry.package_version = Some(marked_version.to_string());
        let counts = entry.change_counts();

        let gap = self
            .providers
            .history
            .load(&project)?
            .and_then(|ledger| ledger.gap_before(&entry));
        if let Some(gap) = &gap {
            warn!(
                expected = %gap.expected_from,
                actual = %gap.actual_from,
                "upstream versions are not continuous with the previous sync"
            );
        }

        let report = self
            .providers
            .history
            .append(&project, entry, project.config.history_limit)?;
        warn_on_mirror_failure(&report);
        info!(version = %marked_version, %counts, "recorded upstream sync");

        Ok(SyncOutput {
            recorded: report.written,
            marked_version,
            manifests_updated,
            counts,
            gap,
        })
    }
}

#[derive(Debug, Clone)]
pub enum HistoryView {
    Latest {
        entry: Box<HistoryEntry>,
        counts: ChangeCounts,
    },
    Since {
        since: DateTime<Utc>,
        changes: CumulativeChanges,
    },
}

/// Reads the ledger for display.
pub struct HistoryShowOperation {
    providers: Providers,
}

impl HistoryShowOperation {
    #[must_use]
    pub fn new(providers: Providers) -> Self {
        Self { providers }
    }

    fn load(&self, project: &IconProject) -> Result<HistoryLedger> {
        let ledger = self.providers.history.load(project)?;
        Ok(ledger.ok_or_else(|| HistoryError::NotFound {
            path: project.history_path(),
        })?)
    }

    /// The newest entry, or everything recorded at or after `since`.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger is missing or unreadable, or empty when
    /// the newest entry is asked for.
    pub fn execute(&self, start_path: &Path, since: Option<DateTime<Utc>>) -> Result<HistoryView> {
        let project = self.providers.project.discover_project(start_path)?;

        if let Some(since) = since {
            return Ok(HistoryView::Since {
                since,
                changes: self.load(&project)?.changes_since(since),
            });
        }

        let entry = self.providers.history.load_latest(&project)?;
        Ok(HistoryView::Latest {
            counts: entry.change_counts(),
            entry: Box::new(entry),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::OperationError;
    use crate::mocks::{MockWorld, history_entry, mock_project};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn sync(from: &str, to: &str, added: &[&str]) -> SyncInput {
        SyncInput {
            timestamp: at(10),
            upstream_package_name: Some("@material-symbols/svg-400".to_string()),
            upstream_version_from: Some(from.to_string()),
            upstream_version_to: Some(to.to_string()),
            added: added.iter().map(ToString::to_string).collect(),
            updated: Vec::new(),
            removed: Vec::new(),
        }
    }

    #[test]
    fn first_sync_after_release_marks_next_minor() -> anyhow::Result<()> {
        let world = MockWorld::new(mock_project(&[("react", "1.4.2"), ("vue", "1.4.2")]));

        let output = RecordSyncOperation::new(world.providers())
            .execute(Path::new("/any"), sync("0.1.0", "0.2.0", &["home"]))?;

        assert_eq!(output.marked_version.to_string(), "1.5.0-unreleased");
        assert_eq!(output.manifests_updated, 2);
        assert_eq!(
            world.history.latest_package_version().as_deref(),
            Some("1.5.0-unreleased")
        );
        Ok(())
    }

    #[test]
    fn repeated_sync_keeps_existing_marker() -> anyhow::Result<()> {
        let world = MockWorld::new(mock_project(&[("react", "1.5.0-unreleased")]))
            .with_history(vec![history_entry("1.5.0-unreleased", &["home"])]);

        let output = RecordSyncOperation::new(world.providers())
            .execute(Path::new("/any"), sync("0.2.0", "0.3.0", &["search"]))?;

        assert_eq!(output.marked_version.to_string(), "1.5.0-unreleased");
        assert_eq!(output.manifests_updated, 0);
        Ok(())
    }

    #[test]
    fn empty_sync_is_skipped() -> anyhow::Result<()> {
        let world = MockWorld::new(mock_project(&[("react", "1.0.0")]));

        let output = RecordSyncOperation::new(world.providers())
            .execute(Path::new("/any"), sync("0.1.0", "0.2.0", &[]))?;

        assert!(!output.recorded);
        assert_eq!(output.marked_version.to_string(), "1.0.0");
        assert_eq!(output.manifests_updated, 0);
        assert_eq!(world.history.saves(), 0);
        assert!(world.history.ledger().is_none());
        assert_eq!(world.manifest_versions(), vec!["1.0.0"]);
        Ok(())
    }

    #[test]
    fn discontinuous_upstream_is_reported() -> anyhow::Result<()> {
        let mut previous = history_entry("1.0.0", &["home"]);
        previous.upstream_version_to = Some("0.2.0".to_string());
        let world = MockWorld::new(mock_project(&[("react", "1.0.0")])).with_history(vec![previous]);

        let output = RecordSyncOperation::new(world.providers())
            .execute(Path::new("/any"), sync("0.3.0", "0.4.0", &["star"]))?;

        let gap = output.gap.expect("gap detected");
        assert_eq!(gap.expected_from, "0.2.0");
        assert_eq!(gap.actual_from, "0.3.0");
        Ok(())
    }

    #[test]
    fn show_latest_and_since() -> anyhow::Result<()> {
        let mut older = history_entry("1.0.0", &["home"]);
        older.timestamp = at(1);
        let mut newer = history_entry("1.1.0-unreleased", &["search", "home"]);
        newer.timestamp = at(5);
        let world = MockWorld::new(mock_project(&[("react", "1.1.0-unreleased")]))
            .with_history(vec![newer, older]);
        let show = HistoryShowOperation::new(world.providers());

        match show.execute(Path::new("/any"), None)? {
            HistoryView::Latest { counts, .. } => assert_eq!(counts.added, 2),
            other => panic!("unexpected view: {other:?}"),
        }
        match show.execute(Path::new("/any"), Some(at(1)))? {
            HistoryView::Since { changes, .. } => {
                assert_eq!(changes.entries, 2);
                assert_eq!(changes.added.len(), 2);
            }
            other => panic!("unexpected view: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn show_without_ledger_is_not_found() {
        let world = MockWorld::new(mock_project(&[("react", "1.0.0")]));

        let err = HistoryShowOperation::new(world.providers())
            .execute(Path::new("/any"), None)
            .expect_err("no ledger");

        assert!(matches!(err, OperationError::History(HistoryError::NotFound { .. })));
    }
}
