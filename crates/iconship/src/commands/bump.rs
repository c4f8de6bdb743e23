use std::path::Path;

use iconship_operations::operations::{BumpInput, BumpOperation, BumpOutput};
use iconship_operations::providers::Providers;

use super::BumpArgs;
use crate::error::Result;

pub(crate) fn run(args: &BumpArgs, start_path: &Path) -> Result<()> {
    let input = BumpInput {
        requested: args.requested(),
    };
    let output = BumpOperation::new(Providers::system()).execute(start_path, &input)?;

    print_bump(&output);

    Ok(())
}

fn print_bump(output: &BumpOutput) {
    println!("{}", output.decision.justification);
    if output.cleared_marker {
        println!(
            "Releasing {} as {} (unreleased marker cleared)",
            output.previous, output.new_version
        );
    } else {
        println!(
            "Bumped {} -> {} ({})",
            output.previous, output.new_version, output.decision.resolved
        );
    }
    println!("Updated {} package manifest(s)", output.manifests_written);
    if output.history_entries_marked > 0 {
        println!(
            "Marked {} history entr{} as released",
            output.history_entries_marked,
            if output.history_entries_marked == 1 { "y" } else { "ies" }
        );
    }
}
