use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use iconship_operations::operations::{PublishAction, PublishInput, PublishOperation};
use iconship_operations::providers::Providers;

use super::PublishArgs;
use crate::error::Result;
use crate::output::StdoutReporter;

pub(crate) fn run(args: PublishArgs, start_path: &Path) -> Result<()> {
    let operation = PublishOperation::new(
        Providers::system(),
        Arc::new(StdoutReporter),
        Utc::now().date_naive(),
    );
    let input = PublishInput {
        tag: args.tag,
        dry_run: args.dry_run,
    };
    let output = operation.execute(start_path, &input)?;

    let summary = match output.action {
        PublishAction::Created => "Created hosted release",
        PublishAction::Edited => "Updated hosted release",
        PublishAction::Planned => "Publish plan verified",
    };
    println!("{summary}: {}", output.tag);

    Ok(())
}
