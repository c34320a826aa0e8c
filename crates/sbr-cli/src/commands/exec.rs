//! `x` command implementation

use std::path::Path;

use sbr_core::Processor;

use super::open_workspace;
use crate::error::{CliError, Result};

/// Run `command` in every checkout and print the reduced output
pub async fn run_exec(path: &Path, processor: Processor, command: &[String]) -> Result<()> {
    let Some((program, args)) = command.split_first() else {
        return Err(CliError::user("no command given"));
    };

    let workspace = open_workspace(path)?;
    let executions = workspace.exec(program, args).await?;

    processor
        .processor()
        .process(&executions, &mut std::io::stdout())?;

    let failed = executions.iter().filter(|e| !e.success).count();
    if failed > 0 {
        return Err(CliError::user(format!(
            "{failed} of {} command(s) failed",
            executions.len()
        )));
    }
    Ok(())
}
