//! Session results and the long-term progress grid.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::practice_engine::models::{Fact, PerformanceData, SessionAttempt};

/// Number of challenging facts listed in a summary.
pub const MAX_CHALLENGING_FACTS: usize = 5;

/// Headline numbers for one finished session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total_questions: usize,
    pub correct_answers: usize,
    /// Percent, `0.0..=100.0`.
    pub accuracy: f64,
    /// Mean response time in seconds.
    pub average_time_secs: f64,
    /// Missed facts, unique, in order of first miss.
    pub challenging_facts: Vec<Fact>,
}

impl SessionSummary {
    pub fn from_history(history: &[SessionAttempt]) -> Self {
        let total = history.len();
        let correct = history.iter().filter(|h| h.is_correct).count();
        let (accuracy, average_time_secs) = if total == 0 {
            (0.0, 0.0)
        } else {
            let total_ms: u64 = history.iter().map(|h| h.time_taken).sum();
            (
                correct as f64 / total as f64 * 100.0,
                total_ms as f64 / total as f64 / 1000.0,
            )
        };

        let mut challenging_facts: Vec<Fact> = Vec::new();
        for miss in history.iter().filter(|h| !h.is_correct) {
            if challenging_facts.len() == MAX_CHALLENGING_FACTS {
                break;
            }
            if !challenging_facts.contains(&miss.fact) {
                challenging_facts.push(miss.fact);
            }
        }

        SessionSummary {
            total_questions: total,
            correct_answers: correct,
            accuracy,
            average_time_secs,
            challenging_facts,
        }
    }
}

// ---------------------------------------------------------------------------
// Progress grid
// ---------------------------------------------------------------------------

/// Coarse mastery level used to colour the progress grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FluencyBand {
    Unseen,
    Weak,
    Emerging,
    Developing,
    Good,
    Strong,
    Mastered,
}

impl FluencyBand {
    pub fn from_fluency(fluency: Option<f64>) -> Self {
        match fluency {
            None                  => FluencyBand::Unseen,
            Some(f) if f > 0.9    => FluencyBand::Mastered,
            Some(f) if f > 0.75   => FluencyBand::Strong,
            Some(f) if f > 0.6    => FluencyBand::Good,
            Some(f) if f > 0.4    => FluencyBand::Developing,
            Some(f) if f > 0.2    => FluencyBand::Emerging,
            Some(_)               => FluencyBand::Weak,
        }
    }
}

impl fmt::Display for FluencyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FluencyBand::Unseen     => "unseen",
            FluencyBand::Weak       => "weak",
            FluencyBand::Emerging   => "emerging",
            FluencyBand::Developing => "developing",
            FluencyBand::Good       => "good",
            FluencyBand::Strong     => "strong",
            FluencyBand::Mastered   => "mastered",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub fact: Fact,
    pub band: FluencyBand,
    pub fluency: Option<f64>,
    /// Share of correct attempts, `None` when never attempted.
    pub accuracy: Option<f64>,
}

/// `size × size` grid of cells, row `r` column `c` holding `r × c`.
///
/// Cells `r × c` and `c × r` read the same record.
pub fn progress_grid(data: &PerformanceData, size: u32) -> Vec<Vec<GridCell>> {
    (1..=size)
        .map(|row| {
            (1..=size)
                .map(|col| {
                    let fact = Fact::new(row, col);
                    let record = data.get(&fact.key());
                    let fluency = record.map(|r| r.fluency);
                    GridCell {
                        fact,
                        band: FluencyBand::from_fluency(fluency),
                        fluency,
                        accuracy: record.and_then(|r| r.accuracy()),
                    }
                })
                .collect()
        })
        .collect()
}
