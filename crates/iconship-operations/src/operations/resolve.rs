use iconship_core::{BumpType, ChangeCounts, ReleaseType};
use iconship_history::HistoryEntry;
use iconship_project::IconProject;

use crate::Result;
use crate::traits::HistoryIO;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionMode {
    Manual,
    Auto,
}

/// The bump a release applies and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDecision {
    pub requested: ReleaseType,
    pub resolved: BumpType,
    pub mode: DecisionMode,
    /// Change volume of the latest history entry, for auto decisions.
    pub counts: Option<ChangeCounts>,
    /// Human-readable reason shown to the operator.
    pub justification: String,
}

/// Auto resolution from the newest history entry.
///
/// Pending unreleased icon changes count as a feature (`minor`); anything
/// else, including an already-released or empty entry, is a `patch`.
#[must_use]
pub fn decide_from_entry(entry: &HistoryEntry) -> ReleaseDecision {
    let counts = entry.change_counts();
    let unreleased = entry.is_unreleased();
    let resolved = if unreleased && counts.total > 0 {
        BumpType::Minor
    } else {
        BumpType::Patch
    };
    let status = if unreleased { "unreleased" } else { "released" };

    ReleaseDecision {
        requested: ReleaseType::Auto,
        resolved,
        mode: DecisionMode::Auto,
        counts: Some(counts),
        justification: format!(
            "auto decision from update history: {counts} ({status}) -> {resolved}"
        ),
    }
}

/// Turns a requested release type into a concrete bump.
///
/// Explicit types pass through untouched; `auto` consults the history.
///
/// # Errors
///
/// Returns an error if `auto` is requested and the history is missing,
/// empty or unreadable.
pub fn resolve_release_type(
    requested: ReleaseType,
    project: &IconProject,
    history: &dyn HistoryIO,
) -> Result<ReleaseDecision> {
    if let Some(bump) = requested.as_bump() {
        return Ok(ReleaseDecision {
            requested,
            resolved: bump,
            mode: DecisionMode::Manual,
            counts: None,
            justification: format!("manual override: {bump}"),
        });
    }

    let entry = history.load_latest(project)?;
    Ok(decide_from_entry(&entry))
}
