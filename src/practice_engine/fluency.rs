//! The fluency update rule.
//!
//! Every answered question produces a performance score `P` in `[0, 1]`:
//! zero for a miss, otherwise a speed-dependent credit. The fact's fluency
//! moves toward `P` by exponential smoothing:
//!
//! ```text
//! fluency' = clamp((1 - α) · fluency + α · P, 0, 1)      α = 0.2
//! ```
//!
//! All functions here are pure. They never touch storage; the
//! [`FluencyStore`](crate::practice_engine::store::FluencyStore) decides when
//! to persist.

use crate::practice_engine::models::{FactPerformance, PerformanceData, SessionAttempt};

/// Smoothing weight given to the newest attempt.
pub const LEARNING_RATE: f64 = 0.2;

/// Correct answers strictly below this many milliseconds earn full credit.
pub const FAST_RESPONSE_MS: u64 = 2000;

/// Correct answers above this many milliseconds earn the lowest credit.
pub const SLOW_RESPONSE_MS: u64 = 4000;

/// How quickly a correct answer arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedBand {
    /// Under 2 s.
    Fast,
    /// 2 s to 4 s inclusive.
    Steady,
    /// Over 4 s.
    Slow,
}

impl SpeedBand {
    pub fn classify(time_taken_ms: u64) -> SpeedBand {
        if time_taken_ms < FAST_RESPONSE_MS {
            SpeedBand::Fast
        } else if time_taken_ms <= SLOW_RESPONSE_MS {
            SpeedBand::Steady
        } else {
            SpeedBand::Slow
        }
    }

    /// Credit awarded for a correct answer in this band.
    pub fn credit(self) -> f64 {
        match self {
            SpeedBand::Fast   => 1.0,
            SpeedBand::Steady => 0.7,
            SpeedBand::Slow   => 0.4,
        }
    }
}

impl std::fmt::Display for SpeedBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpeedBand::Fast   => write!(f, "fast"),
            SpeedBand::Steady => write!(f, "steady"),
            SpeedBand::Slow   => write!(f, "slow"),
        }
    }
}

/// Performance score `P` for one attempt.
pub fn performance_score(attempt: &SessionAttempt) -> f64 {
    if !attempt.is_correct {
        return 0.0;
    }
    SpeedBand::classify(attempt.time_taken).credit()
}

/// One smoothing step toward `score`, clamped to `[0, 1]`.
pub fn smooth(fluency: f64, score: f64) -> f64 {
    let next = (1.0 - LEARNING_RATE) * fluency + LEARNING_RATE * score;
    next.clamp(0.0, 1.0)
}

/// Fold one attempt into a single record in place.
fn update_record(record: &mut FactPerformance, attempt: &SessionAttempt) {
    if attempt.is_correct {
        record.correct = record.correct.saturating_add(1);
    } else {
        record.incorrect = record.incorrect.saturating_add(1);
    }
    record.total_attempts = record.correct.saturating_add(record.incorrect);
    record.response_times.push(attempt.time_taken);
    record.fluency = smooth(record.fluency, performance_score(attempt));
}

/// Return a new mapping with `attempt` applied.
///
/// `data` is left untouched; exactly one record in the result differs from
/// the input (or is new).
pub fn apply_attempt(data: &PerformanceData, attempt: &SessionAttempt) -> PerformanceData {
    let mut next = data.clone();
    update_record(next.entry(attempt.fact.key()).or_default(), attempt);
    next
}

/// Apply a whole history in order, returning a new mapping.
pub fn apply_history(data: &PerformanceData, history: &[SessionAttempt]) -> PerformanceData {
    let mut next = data.clone();
    for attempt in history {
        update_record(next.entry(attempt.fact.key()).or_default(), attempt);
    }
    next
}
