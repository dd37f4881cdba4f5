use std::collections::BTreeMap;
use std::fmt;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Fact primitives
// ---------------------------------------------------------------------------

/// One multiplication operand pair, e.g. `7 × 8`.
///
/// The pair is stored in the order it is presented; identity for performance
/// tracking goes through [`Fact::key`], which is commutative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fact {
    pub a: u32,
    pub b: u32,
}

impl Fact {
    pub fn new(a: u32, b: u32) -> Self {
        Fact { a, b }
    }

    /// Canonical identity key: operands sorted ascending, joined by `x`.
    /// `Fact::new(7, 2).key() == "2x7"`.
    pub fn key(self) -> String {
        let (lo, hi) = if self.a <= self.b { (self.a, self.b) } else { (self.b, self.a) };
        format!("{}x{}", lo, hi)
    }

    /// The correct answer, widened so large tables never overflow.
    pub fn product(self) -> u64 {
        self.a as u64 * self.b as u64
    }

    /// Parse a stored key of the form `"{a}x{b}"`, in either operand order.
    pub fn from_key(key: &str) -> Option<Fact> {
        let (a, b) = key.split_once('x')?;
        Some(Fact::new(a.trim().parse().ok()?, b.trim().parse().ok()?))
    }

    /// Number of decimal digits in the correct answer.
    pub fn answer_len(self) -> usize {
        self.product().to_string().len()
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} × {}", self.a, self.b)
    }
}

// ---------------------------------------------------------------------------
// Performance records
// ---------------------------------------------------------------------------

/// Accumulated history for one canonical fact.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactPerformance {
    pub correct: u32,
    pub incorrect: u32,
    /// Always `correct + incorrect`.
    pub total_attempts: u32,
    /// Milliseconds per attempt, oldest first.
    pub response_times: Vec<u64>,
    /// Smoothed skill estimate in `[0, 1]`.
    pub fluency: f64,
}

impl FactPerformance {
    /// Share of correct attempts, or `None` for a fact never attempted.
    pub fn accuracy(&self) -> Option<f64> {
        if self.total_attempts == 0 {
            None
        } else {
            Some(self.correct as f64 / self.total_attempts as f64)
        }
    }

    /// Repair a record read from storage: clamp fluency and recompute the
    /// attempt total from its parts.
    ///
    /// Counters saturate at `u32::MAX` rather than overflow.
    pub fn normalized(mut self) -> Self {
        self.total_attempts = self.correct.saturating_add(self.incorrect);
        self.fluency = if self.fluency.is_finite() { self.fluency.clamp(0.0, 1.0) } else { 0.0 };
        self
    }

    /// Fold `other` into this record: counters add, response times append,
    /// and fluency comes from whichever record has seen more attempts.
    pub fn merge(mut self, other: FactPerformance) -> Self {
        if other.total_attempts > self.total_attempts {
            self.fluency = other.fluency;
        }
        self.correct = self.correct.saturating_add(other.correct);
        self.incorrect = self.incorrect.saturating_add(other.incorrect);
        self.response_times.extend(other.response_times);
        self.normalized()
    }
}

/// Canonical fact key → record. Ordered so serialized output is stable.
pub type PerformanceData = BTreeMap<String, FactPerformance>;

/// Fluency for `fact`, or `0.0` when the fact has never been attempted.
pub fn fluency_of(data: &PerformanceData, fact: Fact) -> f64 {
    data.get(&fact.key()).map(|p| p.fluency).unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// Session records
// ---------------------------------------------------------------------------

/// One answered question. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAttempt {
    pub fact: Fact,
    pub user_answer: Option<u64>,
    pub correct_answer: u64,
    pub is_correct: bool,
    /// Milliseconds from presentation to submission.
    pub time_taken: u64,
}

impl SessionAttempt {
    /// Build an attempt; the correct answer and verdict are derived from `fact`.
    pub fn new(fact: Fact, user_answer: Option<u64>, time_taken: u64) -> Self {
        let correct_answer = fact.product();
        SessionAttempt {
            fact,
            user_answer,
            correct_answer,
            is_correct: user_answer == Some(correct_answer),
            time_taken,
        }
    }
}
