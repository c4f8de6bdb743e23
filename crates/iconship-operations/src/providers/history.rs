use iconship_history::{HistoryEntry, HistoryLedger, LedgerStore, SaveReport};
use iconship_project::IconProject;

use crate::Result;
use crate::traits::HistoryIO;

/// Ledger files at the locations configured for the project.
pub struct FileSystemHistoryIO;

impl FileSystemHistoryIO {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn store(project: &IconProject) -> LedgerStore {
        let store = LedgerStore::new(project.history_path());
        match project.history_mirror_path() {
            Some(mirror) => store.with_mirror(mirror),
            None => store,
        }
    }
}

impl Default for FileSystemHistoryIO {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryIO for FileSystemHistoryIO {
    fn load(&self, project: &IconProject) -> Result<Option<HistoryLedger>> {
        Ok(Self::store(project).load()?)
    }

    fn load_latest(&self, project: &IconProject) -> Result<HistoryEntry> {
        Ok(Self::store(project).load_latest_entry()?)
    }

    fn append(
        &self,
        project: &IconProject,
        entry: HistoryEntry,
        limit: usize,
    ) -> Result<SaveReport> {
        Ok(Self::store(project).append_entry(entry, limit)?)
    }

    fn save(&self, project: &IconProject, ledger: &HistoryLedger) -> Result<SaveReport> {
        Ok(Self::store(project).save(ledger)?)
    }
}
