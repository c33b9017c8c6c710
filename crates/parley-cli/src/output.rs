//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;

use parley_agent::{CounterpartKind, SessionReport};
use parley_opponent::OpponentSnapshot;
use serde::Serialize;

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Get the current format.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Check if JSON format is selected.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.format, Format::Json)
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }

    /// Write a serializable value to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TableDisplay,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

impl TableDisplay for SessionReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Session {}", self.session_id)?;
        writeln!(writer, "══════════════════════════════════")?;
        writeln!(writer, "Parties:          {} vs {}", self.first, self.second)?;
        writeln!(writer, "Rounds:           {} / {}", self.rounds, self.max_rounds)?;
        match (&self.agreement, &self.accepted_by) {
            (Some(bid), Some(by)) => {
                writeln!(writer, "Agreement:        {bid}")?;
                writeln!(writer, "Accepted by:      {by}")?;
            }
            _ => writeln!(writer, "Agreement:        none")?,
        }
        writeln!(writer)?;
        writeln!(writer, "Utilities")?;
        writeln!(writer, "  {:<16}{:.3}", self.first.as_str(), self.first_utility)?;
        writeln!(writer, "  {:<16}{:.3}", self.second.as_str(), self.second_utility)?;
        Ok(())
    }
}

/// One session of a tournament.
#[derive(Debug, Clone, Serialize)]
pub struct TournamentRow {
    /// Counterpart tactic.
    pub counterpart: CounterpartKind,
    /// Our profile name.
    pub profile: String,
    /// The counterpart's profile name.
    pub opponent_profile: String,
    /// Whether an agreement was reached.
    pub agreement: bool,
    /// Our utility.
    pub utility: f64,
    /// The counterpart's utility.
    pub opponent_utility: f64,
    /// Rounds played.
    pub rounds: u32,
}

/// Per-counterpart averages of a tournament.
#[derive(Debug, Clone, Serialize)]
pub struct CounterpartSummary {
    /// Counterpart tactic.
    pub counterpart: CounterpartKind,
    /// Sessions played.
    pub sessions: usize,
    /// Sessions ending in agreement.
    pub agreements: usize,
    /// Mean utility for us.
    pub mean_utility: f64,
    /// Mean utility for the counterpart.
    pub mean_opponent_utility: f64,
}

/// Tournament results for display.
#[derive(Debug, Clone, Serialize)]
pub struct TournamentResults {
    /// Every session, in play order.
    pub sessions: Vec<TournamentRow>,
    /// Averages per counterpart.
    pub summary: Vec<CounterpartSummary>,
}

impl TournamentResults {
    /// Builds the results, computing the per-counterpart summary.
    #[must_use]
    pub fn new(sessions: Vec<TournamentRow>) -> Self {
        let mut summary: Vec<CounterpartSummary> = Vec::new();
        for row in &sessions {
            let found = summary.iter().position(|s| s.counterpart == row.counterpart);
            let index = if let Some(index) = found {
                index
            } else {
                summary.push(CounterpartSummary {
                    counterpart: row.counterpart,
                    sessions: 0,
                    agreements: 0,
                    mean_utility: 0.0,
                    mean_opponent_utility: 0.0,
                });
                summary.len() - 1
            };
            let entry = &mut summary[index];
            entry.sessions += 1;
            entry.agreements += usize::from(row.agreement);
            entry.mean_utility += row.utility;
            entry.mean_opponent_utility += row.opponent_utility;
        }
        for entry in &mut summary {
            let n = entry.sessions as f64;
            entry.mean_utility /= n;
            entry.mean_opponent_utility /= n;
        }
        Self { sessions, summary }
    }
}

impl TableDisplay for TournamentResults {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.sessions.is_empty() {
            writeln!(writer, "No sessions played")?;
            return Ok(());
        }

        writeln!(
            writer,
            "{:<10}  {:<16}  {:<16}  {:<6}  {:>7}  {:>7}  {:>6}",
            "OPPONENT", "PROFILE", "THEIR PROFILE", "DEAL", "UTIL", "THEIRS", "ROUNDS"
        )?;
        writeln!(writer, "{}", "─".repeat(80))?;
        for row in &self.sessions {
            writeln!(
                writer,
                "{:<10}  {:<16}  {:<16}  {:<6}  {:>7.3}  {:>7.3}  {:>6}",
                row.counterpart.name(),
                truncate(&row.profile, 16),
                truncate(&row.opponent_profile, 16),
                if row.agreement { "yes" } else { "no" },
                row.utility,
                row.opponent_utility,
                row.rounds
            )?;
        }

        writeln!(writer)?;
        writeln!(
            writer,
            "{:<10}  {:>8}  {:>10}  {:>9}  {:>11}",
            "OPPONENT", "SESSIONS", "AGREEMENTS", "MEAN UTIL", "MEAN THEIRS"
        )?;
        writeln!(writer, "{}", "─".repeat(56))?;
        for entry in &self.summary {
            writeln!(
                writer,
                "{:<10}  {:>8}  {:>10}  {:>9.3}  {:>11.3}",
                entry.counterpart.name(),
                entry.sessions,
                entry.agreements,
                entry.mean_utility,
                entry.mean_opponent_utility
            )?;
        }
        Ok(())
    }
}

/// Names of the stored opponent models.
#[derive(Debug, Clone, Serialize)]
pub struct ModelList {
    /// Opponent names, sorted.
    pub opponents: Vec<String>,
}

impl TableDisplay for ModelList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.opponents.is_empty() {
            writeln!(writer, "No stored opponent models")?;
            return Ok(());
        }
        for name in &self.opponents {
            writeln!(writer, "{name}")?;
        }
        writeln!(writer)?;
        writeln!(writer, "Total: {} opponent(s)", self.opponents.len())?;
        Ok(())
    }
}

/// One stored opponent model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelView {
    /// Opponent name.
    pub opponent: String,
    /// The stored state.
    #[serde(flatten)]
    pub snapshot: OpponentSnapshot,
}

impl TableDisplay for ModelView {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Opponent {}", self.opponent)?;
        writeln!(writer, "══════════════════════════════════")?;
        writeln!(writer, "Conceder:         {}", if self.snapshot.is_conceder { "yes" } else { "no" })?;
        writeln!(writer)?;
        writeln!(writer, "{:<16}  {:>7}  {:<16}  {:>6}", "ISSUE", "WEIGHT", "VALUE", "COUNT")?;
        writeln!(writer, "{}", "─".repeat(52))?;
        for (issue, entry) in &self.snapshot.issue_weights {
            let mut first = true;
            for (value, count) in &entry.value_counts {
                if first {
                    writeln!(
                        writer,
                        "{:<16}  {:>7.3}  {:<16}  {:>6}",
                        truncate(issue.as_str(), 16),
                        entry.weight,
                        truncate(value.as_str(), 16),
                        count
                    )?;
                    first = false;
                } else {
                    writeln!(writer, "{:<16}  {:>7}  {:<16}  {:>6}", "", "", truncate(value.as_str(), 16), count)?;
                }
            }
            if first {
                writeln!(writer, "{:<16}  {:>7.3}", truncate(issue.as_str(), 16), entry.weight)?;
            }
        }
        Ok(())
    }
}

/// Truncate a string to a maximum number of characters.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}
