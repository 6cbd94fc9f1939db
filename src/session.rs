//! Operator log for one process run.
//!
//! A single `SessionLog` is created by the caller and handed by reference to
//! whatever narrates a solve. Entries are kept in memory and, when a file is
//! attached, appended to it as they are recorded.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::BalanceError;
use crate::manifest::Manifest;
use crate::solution::{Exhaustion, SolveOutcome};

#[derive(Debug, Default)]
pub struct SessionLog {
    entries: Vec<String>,
    sink: Option<(PathBuf, BufWriter<File>)>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends to `path`, creating it if needed.
    pub fn with_file(path: impl AsRef<Path>) -> Result<Self, BalanceError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| BalanceError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(SessionLog {
            entries: Vec::new(),
            sink: Some((path.to_path_buf(), BufWriter::new(file))),
        })
    }

    #[inline]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn record(&mut self, entry: impl Into<String>) -> Result<(), BalanceError> {
        let entry = entry.into();
        info!(target: "session", "{entry}");
        if let Some((path, sink)) = &mut self.sink {
            writeln!(sink, "{entry}")
                .and_then(|()| sink.flush())
                .map_err(|source| BalanceError::Write {
                    path: path.clone(),
                    source,
                })?;
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Records a human-readable account of one solve.
    pub fn narrate(
        &mut self,
        label: &str,
        manifest: &Manifest,
        outcome: &SolveOutcome,
    ) -> Result<(), BalanceError> {
        match outcome {
            SolveOutcome::AlreadyBalanced => {
                self.record(format!("{label}: ship is already balanced, no moves needed"))
            }
            SolveOutcome::NoSolution(reason) => {
                let why = match reason {
                    Exhaustion::SearchSpace => "no reachable arrangement is balanced",
                    Exhaustion::ExpansionLimit => "search limit reached",
                };
                self.record(format!("{label}: no balancing plan found ({why})"))
            }
            SolveOutcome::Solved(solution) => {
                self.record(format!(
                    "{label}: balancing plan with {} move(s)",
                    solution.moves.len()
                ))?;
                for (step, planned) in solution.moves.iter().enumerate() {
                    self.record(format!(
                        "{label}: move {} \"{}\" ({} kg) from {} to {}, cost {} (running {})",
                        step + 1,
                        manifest.name(planned.container),
                        planned.weight,
                        planned.from,
                        planned.to,
                        planned.step_cost,
                        planned.cumulative_cost,
                    ))?;
                }
                self.record(format!(
                    "{label}: crane returns to park, cost {}; total cost {}",
                    solution.park_cost, solution.total_cost
                ))
            }
        }
    }
}
