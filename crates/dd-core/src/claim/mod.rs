//! Claim sequence timing and progress model.
//!
//! The sequence itself runs in the application layer; this module only
//! holds the values it publishes.

use std::time::Duration;

use serde::Serialize;

/// Durations driving a claim sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimTiming {
    /// Time for progress to go from 0 to 100.
    pub total: Duration,
    /// Interval between progress updates.
    pub tick: Duration,
    /// Pause between reaching 100 and committing the claim.
    pub settle: Duration,
}

impl Default for ClaimTiming {
    fn default() -> Self {
        Self {
            total: Duration::from_millis(5_000),
            tick: Duration::from_millis(50),
            settle: Duration::from_millis(1_000),
        }
    }
}

impl ClaimTiming {
    /// Number of ticks needed to reach 100, never zero.
    pub fn tick_count(&self) -> u32 {
        let tick = self.tick.as_millis().max(1);
        let ticks = self.total.as_millis().div_ceil(tick);
        u32::try_from(ticks).unwrap_or(u32::MAX).max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimPhase {
    Running,
    /// Progress reached 100; the claim is committed after the settle delay.
    Complete,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClaimProgress {
    pub percent: f64,
    pub phase: ClaimPhase,
}

impl ClaimProgress {
    pub fn started() -> Self {
        Self {
            percent: 0.0,
            phase: ClaimPhase::Running,
        }
    }

    /// Progress after `tick` of `ticks` updates.
    pub fn at_tick(tick: u32, ticks: u32) -> Self {
        if tick >= ticks {
            return Self {
                percent: 100.0,
                phase: ClaimPhase::Complete,
            };
        }
        Self {
            percent: f64::from(tick) * 100.0 / f64::from(ticks.max(1)),
            phase: ClaimPhase::Running,
        }
    }

    pub fn rounded(&self) -> u8 {
        self.percent.round().clamp(0.0, 100.0) as u8
    }

    pub fn label(&self) -> &'static str {
        progress_label(self.percent)
    }
}

/// Display text for a progress value. Later bands never map to earlier text.
pub fn progress_label(percent: f64) -> &'static str {
    match percent {
        p if p < 25.0 => "Opening today's drop...",
        p if p < 50.0 => "Counting your points...",
        p if p < 75.0 => "Checking your account...",
        p if p < 95.0 => "Nearly there...",
        _ => "Done!",
    }
}
