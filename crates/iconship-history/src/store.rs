use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::Result;
use crate::entry::HistoryEntry;
use crate::error::HistoryError;
use crate::ledger::HistoryLedger;

/// File-backed ledger with an optional mirror copy.
///
/// The primary file is authoritative. The mirror receives the same bytes
/// after the primary write succeeds; a mirror failure is reported to the caller
/// but never fails the save.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    primary: PathBuf,
    mirror: Option<PathBuf>,
}

/// Outcome of a ledger save.
#[derive(Debug, Default)]
pub struct SaveReport {
    pub written: bool,
    pub mirror_error: Option<HistoryError>,
}

impl LedgerStore {
    #[must_use]
    pub fn new(primary: impl Into<PathBuf>) -> Self {
        Self {
            primary: primary.into(),
            mirror: None,
        }
    }

    #[must_use]
    pub fn with_mirror(mut self, mirror: impl Into<PathBuf>) -> Self {
        self.mirror = Some(mirror.into());
        self
    }

    #[must_use]
    pub fn primary(&self) -> &Path {
        &self.primary
    }

    #[must_use]
    pub fn mirror(&self) -> Option<&Path> {
        self.mirror.as_deref()
    }

    /// Returns `Ok(None)` when the primary file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<HistoryLedger>> {
        if !self.primary.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.primary).map_err(|source| HistoryError::Read {
            path: self.primary.clone(),
            source,
        })?;

        let ledger = serde_json::from_str(&content).map_err(|source| HistoryError::Parse {
            path: self.primary.clone(),
            source,
        })?;

        Ok(Some(ledger))
    }

    /// # Errors
    ///
    /// Returns [`HistoryError::NotFound`] when the ledger file is absent and
    /// [`HistoryError::Empty`] when it holds no entries.
    pub fn load_latest_entry(&self) -> Result<HistoryEntry> {
        let ledger = self.load()?.ok_or_else(|| HistoryError::NotFound {
            path: self.primary.clone(),
        })?;

        ledger
            .latest()
            .cloned()
            .ok_or_else(|| HistoryError::Empty {
                path: self.primary.clone(),
            })
    }

    /// Prepends `entry`, keeps at most `limit` entries and saves both copies.
    ///
    /// Entries without any added, updated or removed icons are not recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing ledger cannot be loaded or the primary
    /// file cannot be written.
    pub fn append_entry(&self, entry: HistoryEntry, limit: usize) -> Result<SaveReport> {
        if !entry.has_changes() {
            debug!("sync recorded no icon changes, ledger left untouched");
            return Ok(SaveReport::default());
        }

        let mut ledger = self.load()?.unwrap_or_default();
        ledger.prepend(entry, limit);
        self.save(&ledger)
    }

    /// # Errors
    ///
    /// Returns an error if the ledger cannot be serialized or the primary file
    /// cannot be written.
    pub fn save(&self, ledger: &HistoryLedger) -> Result<SaveReport> {
        let mut content = serde_json::to_string_pretty(ledger).map_err(HistoryError::Serialize)?;
        content.push('\n');

        write_atomic(&self.primary, &content)?;
        debug!(path = %self.primary.display(), entries = ledger.len(), "wrote update history");

        let mirror_error = self
            .mirror
            .as_ref()
            .and_then(|mirror| write_atomic(mirror, &content).err());

        Ok(SaveReport {
            written: true,
            mirror_error,
        })
    }
}

fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let to_write_error = |source| HistoryError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(to_write_error)?;

    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(to_write_error)?;
    file.write_all(content.as_bytes()).map_err(to_write_error)?;
    file.persist(path).map_err(|e| to_write_error(e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::TempDir;

    use super::*;
    use crate::IconChange;

    fn setup_test_dir() -> TempDir {
        tempfile::tempdir().expect("failed to create temp dir")
    }

    fn entry_with(added: &[&str]) -> HistoryEntry {
        let mut entry = HistoryEntry::new(Utc::now());
        entry.added = added.iter().map(|n| IconChange::from(*n)).collect();
        entry
    }

    #[test]
    fn load_nonexistent_returns_none() {
        let dir = setup_test_dir();
        let store = LedgerStore::new(dir.path().join("update-history.json"));

        assert!(store.load().expect("should succeed").is_none());
    }

    #[test]
    fn latest_entry_on_missing_ledger_is_not_found() {
        let dir = setup_test_dir();
        let store = LedgerStore::new(dir.path().join("update-history.json"));

        let err = store.load_latest_entry().expect_err("no ledger");

        assert!(matches!(err, HistoryError::NotFound { .. }));
    }

    #[test]
    fn latest_entry_on_empty_ledger_is_empty_error() {
        let dir = setup_test_dir();
        let path = dir.path().join("update-history.json");
        fs::write(&path, r#"{"updates":[]}"#).expect("write");

        let err = LedgerStore::new(path).load_latest_entry().expect_err("empty");

        assert!(matches!(err, HistoryError::Empty { .. }));
    }

    #[test]
    fn parse_error_names_path() {
        let dir = setup_test_dir();
        let path = dir.path().join("update-history.json");
        fs::write(&path, "{ not json").expect("write");

        let err = LedgerStore::new(&path).load().expect_err("invalid");

        assert!(err.to_string().contains("update-history.json"));
    }

    #[test]
    fn append_writes_primary_and_mirror_identically() {
        let dir = setup_test_dir();
        let primary = dir.path().join("scripts/update-history.json");
        let mirror = dir.path().join("packages/metadata/update-history.json");
        let store = LedgerStore::new(&primary).with_mirror(&mirror);

        let report = store.append_entry(entry_with(&["home"]), 100).expect("append");

        assert!(report.written);
        assert!(report.mirror_error.is_none());
        let a = fs::read(&primary).expect("primary");
        let b = fs::read(&mirror).expect("mirror");
        assert_eq!(a, b);
    }

    #[test]
    fn append_skips_entries_without_changes() {
        let dir = setup_test_dir();
        let primary = dir.path().join("update-history.json");
        let store = LedgerStore::new(&primary);

        let report = store.append_entry(entry_with(&[]), 100).expect("append");

        assert!(!report.written);
        assert!(!primary.exists());
    }

    #[test]
    fn append_puts_newest_first() {
        let dir = setup_test_dir();
        let store = LedgerStore::new(dir.path().join("update-history.json"));

        store.append_entry(entry_with(&["first"]), 100).expect("append");
        store.append_entry(entry_with(&["second"]), 100).expect("append");

        let latest = store.load_latest_entry().expect("latest");
        assert_eq!(latest.added[0].name(), "second");
    }

    #[test]
    fn mirror_failure_does_not_fail_save() {
        let dir = setup_test_dir();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").expect("write");
        let store = LedgerStore::new(dir.path().join("update-history.json"))
            .with_mirror(blocker.join("update-history.json"));

        let report = store.append_entry(entry_with(&["home"]), 100).expect("append");

        assert!(report.written);
        assert!(report.mirror_error.is_some());
        assert!(store.primary().exists());
    }
}
