//! Run a command in every checkout and reduce the outputs

use std::collections::{BTreeMap, HashMap};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use tokio::process::Command;
use tokio::task::{Id, JoinSet};
use tracing::{debug, warn};

use crate::error::Result;
use crate::scanner;

/// One command run in one checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Execution {
    pub rel: String,
    pub path: PathBuf,
    pub success: bool,
    /// Stdout followed by stderr, or the spawn error.
    pub output: String,
}

impl Execution {
    /// Output with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.output.trim()
    }
}

/// Run `command args` in each of `paths` concurrently.
///
/// Results are ordered by path. A command that cannot be spawned yields a
/// failed execution rather than an error.
pub async fn run_all(
    root: &Path,
    paths: &[PathBuf],
    command: &str,
    args: &[String],
) -> Result<Vec<Execution>> {
    let mut tasks = JoinSet::new();
    let mut pending = HashMap::new();
    for path in paths {
        let rel = scanner::rel_path(root, path)?;
        let task = {
            let (rel, path) = (rel.clone(), path.clone());
            let (command, args) = (command.to_string(), args.to_vec());
            tasks.spawn(async move { run_one(rel, path, &command, &args).await })
        };
        pending.insert(task.id(), (rel, path.clone()));
    }

    Ok(join_all(tasks, pending).await)
}

/// Collect every task, ordered by path. A task that panicked or was
/// cancelled becomes a failed execution for its checkout.
async fn join_all(
    mut tasks: JoinSet<Execution>,
    mut pending: HashMap<Id, (String, PathBuf)>,
) -> Vec<Execution> {
    let mut executions = Vec::with_capacity(pending.len());
    while let Some(joined) = tasks.join_next_with_id().await {
        match joined {
            Ok((_, execution)) => executions.push(execution),
            Err(e) => {
                warn!(error = %e, "Execution task did not complete");
                if let Some((rel, path)) = pending.remove(&e.id()) {
                    executions.push(Execution {
                        rel,
                        path,
                        success: false,
                        output: format!("task did not complete: {e}"),
                    });
                }
            }
        }
    }
    executions.sort_by(|a, b| a.path.as_os_str().cmp(b.path.as_os_str()));
    executions
}

async fn run_one(rel: String, path: PathBuf, command: &str, args: &[String]) -> Execution {
    debug!(%rel, command, ?args, "Executing");
    match Command::new(command).args(args).current_dir(&path).output().await {
        Ok(output) => {
            let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
            text.push_str(&String::from_utf8_lossy(&output.stderr));
            Execution {
                rel,
                path,
                success: output.status.success(),
                output: text,
            }
        }
        Err(e) => Execution {
            rel,
            path,
            success: false,
            output: format!("cannot run {command}: {e}"),
        },
    }
}

/// Reduces a batch of executions to printed output.
pub trait ExecutionProcessor {
    fn process(&self, executions: &[Execution], out: &mut dyn Write) -> io::Result<()>;
}

/// Available reductions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Processor {
    /// Every output under a header naming its checkout.
    #[default]
    Print,
    /// Outputs joined, nothing else.
    Concatenate,
    /// Outputs parsed as numbers and added up.
    Sum,
    /// Count of each distinct output.
    Histogram,
    /// SHA-1 over the outputs in path order.
    Digest,
}

impl Processor {
    pub fn processor(self) -> Box<dyn ExecutionProcessor> {
        match self {
            Processor::Print => Box::new(PrintProcessor),
            Processor::Concatenate => Box::new(ConcatenateProcessor),
            Processor::Sum => Box::new(SumProcessor),
            Processor::Histogram => Box::new(HistogramProcessor),
            Processor::Digest => Box::new(DigestProcessor),
        }
    }
}

fn successful(executions: &[Execution]) -> impl Iterator<Item = &Execution> {
    executions.iter().filter(|e| e.success)
}

pub struct PrintProcessor;

impl ExecutionProcessor for PrintProcessor {
    fn process(&self, executions: &[Execution], out: &mut dyn Write) -> io::Result<()> {
        for execution in executions {
            let marker = if execution.success { "" } else { " (failed)" };
            writeln!(out, "=== {}{marker}", execution.rel)?;
            let trimmed = execution.trimmed();
            if !trimmed.is_empty() {
                writeln!(out, "{trimmed}")?;
            }
        }
        writeln!(out, "Done ({} repositories)", executions.len())
    }
}

pub struct ConcatenateProcessor;

impl ExecutionProcessor for ConcatenateProcessor {
    fn process(&self, executions: &[Execution], out: &mut dyn Write) -> io::Result<()> {
        for execution in successful(executions) {
            out.write_all(execution.output.as_bytes())?;
        }
        Ok(())
    }
}

pub struct SumProcessor;

impl ExecutionProcessor for SumProcessor {
    fn process(&self, executions: &[Execution], out: &mut dyn Write) -> io::Result<()> {
        let mut total = 0.0_f64;
        for execution in successful(executions) {
            let value = execution.trimmed().parse::<f64>().unwrap_or(f64::NAN);
            writeln!(out, "\t{value}\t{}", execution.rel)?;
            total += value;
        }
        writeln!(out, "\t{total}\tTotal")
    }
}

pub struct HistogramProcessor;

impl ExecutionProcessor for HistogramProcessor {
    fn process(&self, executions: &[Execution], out: &mut dyn Write) -> io::Result<()> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for execution in successful(executions) {
            *counts.entry(execution.trimmed()).or_default() += 1;
        }

        let mut rows: Vec<(&str, usize)> = counts.into_iter().collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let mut total = 0;
        for (value, count) in rows {
            writeln!(out, "{count}\t{value}")?;
            total += count;
        }
        writeln!(out, "{total}\tTotal")
    }
}

pub struct DigestProcessor;

impl ExecutionProcessor for DigestProcessor {
    fn process(&self, executions: &[Execution], out: &mut dyn Write) -> io::Result<()> {
        let mut hasher = Sha1::new();
        for execution in successful(executions) {
            hasher.update(execution.trimmed().as_bytes());
        }
        writeln!(out, "{:x}", hasher.finalize())
    }
}
