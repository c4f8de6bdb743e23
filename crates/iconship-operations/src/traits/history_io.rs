use iconship_history::{HistoryEntry, HistoryLedger, SaveReport};
use iconship_project::IconProject;

use crate::Result;

pub trait HistoryIO: Send + Sync {
    /// Returns `Ok(None)` when the project has no ledger yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger exists but cannot be read or parsed.
    fn load(&self, project: &IconProject) -> Result<Option<HistoryLedger>>;

    /// Newest ledger entry.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::NotFound` if there is no ledger and
    /// `HistoryError::Empty` if it holds no entries.
    fn load_latest(&self, project: &IconProject) -> Result<HistoryEntry>;

    /// Prepends `entry`, keeps at most `limit` entries and saves. Entries
    /// without icon changes leave the ledger untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be loaded or the primary
    /// location cannot be written.
    fn append(&self, project: &IconProject, entry: HistoryEntry, limit: usize)
    -> Result<SaveReport>;

    /// Writes the ledger to its primary location and the mirror, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the primary location cannot be written. Mirror
    /// failures are reported in the returned [`SaveReport`].
    fn save(&self, project: &IconProject, ledger: &HistoryLedger) -> Result<SaveReport>;
}
