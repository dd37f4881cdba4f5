//! Core practice engine — fluency tracking, question sampling, and sessions.
//!
//! ## Module overview
//!
//! | Module     | Purpose |
//! |------------|---------|
//! | `models`   | Shared types: facts, performance records, session attempts |
//! | `config`   | Session configuration, validation, and table presets |
//! | `fluency`  | Pure update rule: performance score + exponential smoothing |
//! | `store`    | `FluencyStore` over a durable key-value slot (file or memory) |
//! | `sampler`  | Inverse-fluency weighted random selection of the next fact |
//! | `session`  | `SessionRunner` state machine driving one practice session |
//! | `hints`    | Fail-open hint text for missed facts |
//! | `report`   | Session summary and the progress grid |

pub mod config;
pub mod fluency;
pub mod hints;
pub mod models;
pub mod report;
pub mod sampler;
pub mod session;
pub mod store;

// Re-export the public API surface so callers can use
// `practice_engine::SessionRunner` without reaching into sub-modules.
pub use config::{ConfigError, SessionConfig, TablePreset};
pub use fluency::{apply_attempt, apply_history, performance_score, SpeedBand};
pub use hints::{HintError, HintProvider, HintService, StrategyHints};
pub use models::{Fact, FactPerformance, PerformanceData, SessionAttempt};
pub use report::{progress_grid, FluencyBand, GridCell, SessionSummary};
pub use sampler::{candidate_pool, select_from_pool, QuestionSampler};
pub use session::{AnswerOutcome, SessionRunner, SessionState};
pub use store::{FluencyStore, JsonFileStore, KeyValueStore, MemoryStore, StorageError};
