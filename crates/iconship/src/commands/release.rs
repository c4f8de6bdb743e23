use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use iconship_operations::ReleaseMode;
use iconship_operations::operations::{ReleaseInput, ReleaseOperation, ReleaseOutput};
use iconship_operations::providers::Providers;
use tracing::debug;

use super::ReleaseArgs;
use crate::error::Result;
use crate::output::StdoutReporter;

pub(crate) fn run(args: ReleaseArgs, start_path: &Path) -> Result<()> {
    let mode = if args.ci {
        ReleaseMode::Ci
    } else {
        ReleaseMode::Local
    };

    let operation = ReleaseOperation::new(
        Providers::system(),
        Arc::new(StdoutReporter),
        Utc::now().date_naive(),
    );
    let input = ReleaseInput {
        mode,
        requested: args.release_type,
        dry_run: args.dry_run,
        ci_ref_name: args.ref_name,
    };
    let output = operation.execute(start_path, &input)?;
    debug!(audit = %output.audit, "release pipeline finished");

    print_release(&output);

    Ok(())
}

fn print_release(output: &ReleaseOutput) {
    let Some(tag) = &output.tag else {
        return;
    };

    println!();
    if output.state.dry_run {
        println!("Release plan verified: {tag}");
    } else {
        println!("Release completed: {tag}");
        if let Some(commit) = &output.commit {
            println!("Release commit: {}", commit.sha);
        }
    }
}
