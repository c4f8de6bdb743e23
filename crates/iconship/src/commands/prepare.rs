use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use iconship_operations::operations::{PrepareInput, PrepareOperation, PrepareOutcome};
use iconship_operations::providers::Providers;

use super::PrepareArgs;
use crate::error::Result;
use crate::output::StdoutReporter;

pub(crate) fn run(args: &PrepareArgs, start_path: &Path) -> Result<()> {
    let operation = PrepareOperation::new(
        Providers::system(),
        Arc::new(StdoutReporter),
        Utc::now().date_naive(),
    );
    let input = PrepareInput {
        requested: args.release_type,
        dry_run: args.dry_run,
    };
    let outcome = operation.execute(start_path, &input)?;

    match outcome {
        PrepareOutcome::NothingToDo => println!("Nothing to do."),
        PrepareOutcome::Prepared {
            previous,
            new_version,
            next_tag,
            ..
        } => {
            if args.dry_run {
                println!("Prepare plan verified: {previous} -> {new_version}");
            } else {
                println!("Prepared release: {previous} -> {new_version}");
                println!("Commit the changes, then run the CI release.");
            }
            println!("Next tag (manual): {next_tag}");
        }
    }

    Ok(())
}
