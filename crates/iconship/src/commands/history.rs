use std::collections::BTreeSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use iconship_history::IconChange;
use iconship_operations::operations::{
    HistoryShowOperation, HistoryView, RecordSyncOperation, SyncInput,
};
use iconship_operations::providers::Providers;

use super::RecordArgs;
use crate::error::Result;

pub(crate) fn show(since: Option<DateTime<Utc>>, start_path: &Path) -> Result<()> {
    let view = HistoryShowOperation::new(Providers::system()).execute(start_path, since)?;

    match view {
        HistoryView::Latest { entry, counts } => {
            println!("Latest sync: {}", entry.timestamp.to_rfc3339());
            if let Some(version) = &entry.package_version {
                println!("Package version: {version}");
            }
            if let (Some(from), Some(to)) = (&entry.upstream_version_from, &entry.upstream_version_to)
            {
                let package = entry.upstream_package_name.as_deref().unwrap_or("upstream");
                println!("Upstream: {package} {from} -> {to}");
            }
            println!("Changes: {counts}");
            print_names("Added", entry.added.iter().map(IconChange::name));
            print_names("Updated", entry.updated.iter().map(IconChange::name));
            print_names("Removed", entry.removed.iter().map(IconChange::name));
        }
        HistoryView::Since { since, changes } => {
            println!(
                "Changes since {} ({} sync(s)):",
                since.to_rfc3339(),
                changes.entries
            );
            if changes.is_empty() {
                println!("  none");
            }
            print_set("Added", &changes.added);
            print_set("Updated", &changes.updated);
            print_set("Removed", &changes.removed);
        }
    }

    Ok(())
}

pub(crate) fn record(args: RecordArgs, start_path: &Path) -> Result<()> {
    let input = SyncInput {
        timestamp: args.timestamp.unwrap_or_else(Utc::now),
        upstream_package_name: args.package,
        upstream_version_from: args.from,
        upstream_version_to: args.to,
        added: args.added,
        updated: args.updated,
        removed: args.removed,
    };
    let output = RecordSyncOperation::new(Providers::system()).execute(start_path, input)?;

    if !output.recorded {
        println!("No icon changes detected; update history left unchanged");
        return Ok(());
    }
    println!("Recorded sync: {}", output.counts);
    println!("Package version: {}", output.marked_version);
    if output.manifests_updated > 0 {
        println!("Updated {} package manifest(s)", output.manifests_updated);
    }
    if let Some(gap) = output.gap {
        println!(
            "Warning: upstream history is not continuous (expected from {}, got {})",
            gap.expected_from, gap.actual_from
        );
    }

    Ok(())
}

fn print_names<'a>(label: &str, names: impl Iterator<Item = &'a str>) {
    let names: Vec<&str> = names.collect();
    if !names.is_empty() {
        println!("{label}: {}", names.join(", "));
    }
}

fn print_set(label: &str, names: &BTreeSet<String>) {
    print_names(label, names.iter().map(String::as_str));
}
