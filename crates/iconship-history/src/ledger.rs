use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entry::HistoryEntry;

/// In-memory update ledger, newest entry first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryLedger {
    #[serde(default)]
    updates: Vec<HistoryEntry>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Two neighbouring entries whose upstream versions do not chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuityGap {
    /// Index of the newer entry of the pair.
    pub index: usize,
    pub expected_from: String,
    pub actual_from: String,
}

/// Union of icon names touched across several syncs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CumulativeChanges {
    pub entries: usize,
    pub added: BTreeSet<String>,
    pub updated: BTreeSet<String>,
    pub removed: BTreeSet<String>,
}

impl CumulativeChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}

impl HistoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.updates.first()
    }

    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.updates
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Inserts `entry` at the front and drops the oldest entries beyond `limit`.
    pub fn prepend(&mut self, entry: HistoryEntry, limit: usize) {
        self.updates.insert(0, entry);
        self.updates.truncate(limit);
    }

    /// Rewrites `X.Y.Z-unreleased` markers for `version` to the plain version.
    ///
    /// Returns the number of entries rewritten.
    pub fn mark_released(&mut self, version: &Version) -> usize {
        let marker = format!("{version}{}", iconship_core::UNRELEASED_SUFFIX);
        let released = version.to_string();
        let mut rewritten = 0;

        for entry in &mut self.updates {
            if entry.package_version.as_deref() == Some(marker.as_str()) {
                entry.package_version = Some(released.clone());
                rewritten += 1;
            }
        }

        rewritten
    }

    /// Finds adjacent entries where the older `upstream_version_to` does not
    /// match the newer `upstream_version_from`. Entries missing either side
    /// are not compared.
    #[must_use]
    pub fn continuity_gaps(&self) -> Vec<ContinuityGap> {
        self.updates
            .windows(2)
            .enumerate()
            .filter_map(|(index, pair)| {
                let newer = pair[0].upstream_version_from.as_deref()?;
                let older = pair[1].upstream_version_to.as_deref()?;
                (newer != older).then(|| ContinuityGap {
                    index,
                    expected_from: older.to_string(),
                    actual_from: newer.to_string(),
                })
            })
            .collect()
    }

    /// Gap that prepending `entry` would open against the newest entry.
    #[must_use]
    pub fn gap_before(&self, entry: &HistoryEntry) -> Option<ContinuityGap> {
        let newer = entry.upstream_version_from.as_deref()?;
        let older = self.latest()?.upstream_version_to.as_deref()?;
        (newer != older).then(|| ContinuityGap {
            index: 0,
            expected_from: older.to_string(),
            actual_from: newer.to_string(),
        })
    }

    /// Accumulates every entry recorded at or after `since`.
    #[must_use]
    pub fn changes_since(&self, since: DateTime<Utc>) -> CumulativeChanges {
        let mut changes = CumulativeChanges::default();

        for entry in self.updates.iter().filter(|e| e.timestamp >= since) {
            changes.entries += 1;
            changes
                .added
                .extend(entry.added.iter().map(|c| c.name().to_string()));
            changes
                .updated
                .extend(entry.updated.iter().map(|c| c.name().to_string()));
            changes
                .removed
                .extend(entry.removed.iter().map(|c| c.name().to_string()));
        }

        changes
    }
}
