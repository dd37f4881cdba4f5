//! Inverse-fluency weighted question selection.
//!
//! Every candidate fact gets a weight
//!
//! ```text
//! weight = (1 - fluency)² · 100 + 1 + noise      noise ∈ [0, 1)
//! ```
//!
//! so an unseen fact (fluency 0) is roughly a hundred times likelier than a
//! mastered one, while the `+1` floor keeps mastered facts in rotation.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::practice_engine::models::{fluency_of, Fact, PerformanceData};

/// Lowest and highest second operand paired with each selected table.
pub const MULTIPLIERS: std::ops::RangeInclusive<u32> = 2..=9;

/// Second operand used when the regular multiplier range yields nothing.
pub const FALLBACK_MULTIPLIER: u32 = 5;

/// Enumerate `(table, b)` for every selected table and `b` in 2..=9.
pub fn candidate_pool(tables: &BTreeSet<u32>) -> Vec<Fact> {
    let mut pool: Vec<Fact> = tables
        .iter()
        .flat_map(|&a| MULTIPLIERS.map(move |b| Fact::new(a, b)))
        .collect();

    if pool.is_empty() {
        pool = tables.iter().map(|&a| Fact::new(a, FALLBACK_MULTIPLIER)).collect();
    }
    pool
}

/// Deterministic part of a candidate's weight.
pub fn fact_weight(fluency: f64) -> f64 {
    let need = 1.0 - fluency.clamp(0.0, 1.0);
    need * need * 100.0 + 1.0
}

/// Draw one fact from `pool`, biased toward low fluency.
///
/// Returns `None` only when `pool` is empty.
pub fn select_from_pool<R: Rng>(rng: &mut R, pool: &[Fact], data: &PerformanceData) -> Option<Fact> {
    if pool.is_empty() {
        return None;
    }

    let weighted: Vec<(Fact, f64)> = pool
        .iter()
        .map(|&fact| (fact, fact_weight(fluency_of(data, fact)) + rng.gen::<f64>()))
        .collect();

    let total: f64 = weighted.iter().map(|(_, w)| w).sum();
    let target = rng.gen::<f64>() * total;

    let mut cumulative = 0.0;
    for &(fact, weight) in &weighted {
        cumulative += weight;
        if cumulative >= target {
            return Some(fact);
        }
    }

    // Rounding left the walk short of the target.
    debug!(total, target, "weighted walk fell through, picking uniformly");
    pool.choose(rng).copied()
}

/// Stateful sampler owning its RNG.
///
/// Pass a seed for reproducible question sequences; `None` seeds from
/// entropy.
pub struct QuestionSampler {
    rng: StdRng,
}

impl QuestionSampler {
    pub fn new(rng_seed: Option<u64>) -> Self {
        let rng = match rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };
        QuestionSampler { rng }
    }

    /// Pick the next fact for `tables` given current fluency.
    pub fn select_next(&mut self, tables: &BTreeSet<u32>, data: &PerformanceData) -> Option<Fact> {
        let pool = candidate_pool(tables);
        let fact = select_from_pool(&mut self.rng, &pool, data);
        if let Some(fact) = fact {
            debug!(fact = %fact, pool = pool.len(), "selected next fact");
        }
        fact
    }
}
