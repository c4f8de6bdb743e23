//! Append-only ledger of upstream icon-set syncs.
//!
//! The ledger is stored as `{ "updates": [...] }`, newest entry first, and is
//! capped at [`DEFAULT_HISTORY_LIMIT`] entries. It is mirrored into a second
//! location that is rewritten from the same bytes on every save.

mod entry;
mod error;
mod ledger;
mod store;

pub use entry::{HistoryEntry, IconChange, compute_change_counts, is_unreleased};
pub use error::HistoryError;
pub use ledger::{ContinuityGap, CumulativeChanges, HistoryLedger};
pub use store::{LedgerStore, SaveReport};

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

pub type Result<T> = std::result::Result<T, HistoryError>;
