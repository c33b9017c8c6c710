//! Behavioural classification of the opponent.
//!
//! The classifiers look at how good the opponent's proposals are *for us*
//! over time. Rising self-utility means the opponent is conceding; flat
//! self-utility means it is holding firm.
//!
//! All flags are sticky: once raised they stay raised for the session.

use parley_core::Progress;
use serde::{Deserialize, Serialize};

/// Samples averaged at the start and end of the series.
pub const WINDOW: usize = 5;

/// Minimum early→recent gain for a conceder.
pub const CONCEDER_THRESHOLD: f64 = 0.2;

/// Minimum late→final gain for a late conceder.
pub const LATE_CONCEDER_THRESHOLD: f64 = 0.05;

/// Upper bound of the small positive gain of a boulware opponent.
pub const BOULWARE_THRESHOLD: f64 = 0.1;

/// Gain below which the opponent is a hardliner.
pub const HARDLINER_THRESHOLD: f64 = 0.05;

/// Samples inspected for deadlock.
pub const DEADLOCK_WINDOW: usize = 6;

/// Largest step between consecutive samples still counted as "no movement".
pub const DEADLOCK_THRESHOLD: f64 = 0.01;

/// Start of the late window `[0.85, 0.95)`.
pub const LATE_WINDOW_START: f64 = 0.85;

/// Start of the final window `[0.95, 1.0]`.
pub const FINAL_WINDOW_START: f64 = 0.95;

/// Self-utility of every received bid, plus the late and final windows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UtilitySeries {
    all: Vec<f64>,
    late: Vec<f64>,
    last: Vec<f64>,
}

impl UtilitySeries {
    /// Records the self-utility of a bid received at `progress`.
    pub fn record(&mut self, utility: f64, progress: Progress) {
        self.all.push(utility);
        if progress.in_window(LATE_WINDOW_START, FINAL_WINDOW_START) {
            self.late.push(utility);
        } else if progress.value() >= FINAL_WINDOW_START {
            self.last.push(utility);
        }
    }

    /// Every recorded self-utility, oldest first.
    #[must_use]
    pub fn all(&self) -> &[f64] {
        &self.all
    }

    /// Samples received with progress in `[0.85, 0.95)`.
    #[must_use]
    pub fn late(&self) -> &[f64] {
        &self.late
    }

    /// Samples received with progress in `[0.95, 1.0]`.
    #[must_use]
    pub fn last(&self) -> &[f64] {
        &self.last
    }

    /// Number of recorded samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

/// The four sticky behaviour flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Classification {
    /// The opponent's offers improve markedly for us over time.
    pub conceding: bool,
    /// The opponent barely moves (boulware or hardliner).
    pub stubborn: bool,
    /// The opponent's offers have stopped changing.
    pub deadlocked: bool,
    /// The opponent concedes in the final stretch.
    pub late_conceding: bool,
}

impl Classification {
    /// Re-runs every classifier against `series` and raises any flag that
    /// now applies. Never lowers a flag.
    ///
    /// Returns the flags that were newly raised by this call.
    pub fn refresh(&mut self, series: &UtilitySeries) -> Self {
        let before = *self;

        self.late_conceding |= detect_late_conceder(series.late(), series.last());
        self.conceding |= detect_conceder(series.all());
        // Two overlapping stubbornness checks, kept independent.
        self.stubborn |= detect_boulware(series.all());
        self.stubborn |= detect_hardliner(series.all());
        self.deadlocked |= detect_deadlock(series.all());

        Self {
            conceding: self.conceding && !before.conceding,
            stubborn: self.stubborn && !before.stubborn,
            deadlocked: self.deadlocked && !before.deadlocked,
            late_conceding: self.late_conceding && !before.late_conceding,
        }
    }

    /// Returns true if any flag is raised.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.conceding || self.stubborn || self.deadlocked || self.late_conceding
    }
}

fn mean(samples: &[f64]) -> f64 {
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Average of the last window minus average of the first window.
fn early_to_recent_gain(series: &[f64]) -> Option<f64> {
    if series.len() < 2 * WINDOW {
        return None;
    }
    let early = mean(&series[..WINDOW]);
    let recent = mean(&series[series.len() - WINDOW..]);
    Some(recent - early)
}

/// Gain of at least [`CONCEDER_THRESHOLD`] from the first to the last window.
#[must_use]
pub fn detect_conceder(series: &[f64]) -> bool {
    early_to_recent_gain(series).is_some_and(|gain| gain >= CONCEDER_THRESHOLD)
}

/// Final-window average exceeds the late-window average by more than
/// [`LATE_CONCEDER_THRESHOLD`]; needs two samples in each window.
#[must_use]
pub fn detect_late_conceder(late: &[f64], last: &[f64]) -> bool {
    if late.len() < 2 || last.len() < 2 {
        return false;
    }
    mean(last) - mean(late) > LATE_CONCEDER_THRESHOLD
}

/// Small positive gain: the opponent concedes, but only slightly.
#[must_use]
pub fn detect_boulware(series: &[f64]) -> bool {
    early_to_recent_gain(series).is_some_and(|gain| 0.0 < gain && gain < BOULWARE_THRESHOLD)
}

/// Gain below [`HARDLINER_THRESHOLD`], including any loss.
#[must_use]
pub fn detect_hardliner(series: &[f64]) -> bool {
    early_to_recent_gain(series).is_some_and(|gain| gain < HARDLINER_THRESHOLD)
}

/// Every consecutive step in the last [`DEADLOCK_WINDOW`] samples is below
/// [`DEADLOCK_THRESHOLD`].
#[must_use]
pub fn detect_deadlock(series: &[f64]) -> bool {
    if series.len() < DEADLOCK_WINDOW {
        return false;
    }
    series[series.len() - DEADLOCK_WINDOW..]
        .windows(2)
        .all(|pair| (pair[1] - pair[0]).abs() < DEADLOCK_THRESHOLD)
}
