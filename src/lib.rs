//! # times_table_drill
//!
//! An offline, adaptive multiplication-fact practice engine.
//!
//! The engine keeps a per-fact fluency score, updates it after every timed
//! answer, and uses it to decide which fact to ask next. Weak facts come up
//! often; mastered facts still come back now and then.
//!
//! ## How it works
//!
//! 1. Open a [`FluencyStore`] over a durable slot ([`JsonFileStore`] or
//!    [`MemoryStore`]). Missing or corrupt data simply starts fresh.
//! 2. Build a [`SessionConfig`] with the tables to practise and a question
//!    count (at least 5), then call [`SessionRunner::start`].
//! 3. Feed the user's typing to [`SessionRunner::enter_input`]. The answer is
//!    submitted automatically once it has as many digits as the correct
//!    product. A miss must be retyped correctly before moving on.
//! 4. Every recorded answer updates the fact's fluency and is persisted
//!    straight away. When the session completes, [`SessionRunner::finish`]
//!    hands back the full history for a [`SessionSummary`].
//!
//! ## Fluency model
//!
//! - A miss scores `0`. A correct answer scores `1.0` under 2 s, `0.7` from
//!   2 s to 4 s, and `0.4` beyond that.
//! - `fluency' = 0.8 · fluency + 0.2 · score`, clamped to `[0, 1]`.
//! - `7 × 2` and `2 × 7` share one record, keyed `"2x7"`.
//!
//! ## Quick start
//!
//! ```rust
//! use times_table_drill::{
//!     AnswerOutcome, FluencyStore, MemoryStore, SessionConfig, SessionRunner, SessionSummary,
//! };
//!
//! let mut store = FluencyStore::open(MemoryStore::new());
//! let config = SessionConfig::new([7], 5);
//! let mut runner = SessionRunner::start(config, &mut store, Some(42)).expect("valid config");
//!
//! while let Some(fact) = runner.current_fact() {
//!     // A perfect student answering in 900 ms.
//!     let outcome = runner.submit_answer(&fact.product().to_string(), 900);
//!     assert!(matches!(outcome, AnswerOutcome::Correct(_)));
//! }
//!
//! let history = runner.finish().expect("session complete");
//! let summary = SessionSummary::from_history(&history);
//! assert_eq!(summary.accuracy, 100.0);
//! ```

pub mod practice_engine;

// Convenience re-exports so callers can use `times_table_drill::SessionRunner`
// directly without reaching into `practice_engine::`.
pub use practice_engine::{
    apply_attempt, apply_history, candidate_pool, performance_score, progress_grid,
    select_from_pool, AnswerOutcome, ConfigError, Fact, FactPerformance, FluencyBand,
    FluencyStore, GridCell, HintError, HintProvider, HintService, JsonFileStore, KeyValueStore,
    MemoryStore, PerformanceData, QuestionSampler, SessionAttempt, SessionConfig, SessionRunner,
    SessionState, SessionSummary, SpeedBand, StorageError, StrategyHints, TablePreset,
};

#[cfg(test)]
mod tests;
