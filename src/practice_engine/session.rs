//! One practice session, question by question.
//!
//! ```text
//!                 correct                       wrong
//!   AwaitingAnswer ──────► next / Complete      AwaitingAnswer ──────► Correcting
//!   Correcting ── retyped correct answer ──► next / Complete
//! ```
//!
//! A miss is recorded the moment it happens; the retyped correct answer that
//! follows is not an attempt. Each recorded attempt goes straight to the
//! [`FluencyStore`], so the sampler always reads current fluency and nothing
//! is lost if the session is abandoned.

use std::time::Instant;

use tracing::debug;

use crate::practice_engine::config::{ConfigError, SessionConfig};
use crate::practice_engine::models::{Fact, PerformanceData, SessionAttempt};
use crate::practice_engine::sampler::QuestionSampler;
use crate::practice_engine::store::{FluencyStore, KeyValueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingAnswer,
    /// The last answer was wrong; the user must type the correct one.
    Correcting,
    Complete,
}

/// What happened to a piece of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Not enough digits yet, not a number, or a wrong retype. Nothing recorded.
    Incomplete,
    Correct(SessionAttempt),
    Incorrect(SessionAttempt),
    /// The correct answer was retyped after a miss.
    Corrected,
    /// The session already finished; input is ignored.
    SessionComplete,
}

pub struct SessionRunner<'s, S: KeyValueStore> {
    config: SessionConfig,
    store: &'s mut FluencyStore<S>,
    sampler: QuestionSampler,
    state: SessionState,
    current: Fact,
    presented_at: Instant,
    history: Vec<SessionAttempt>,
}

impl<'s, S: KeyValueStore> SessionRunner<'s, S> {
    /// Validate `config` and present the first question.
    pub fn start(
        config: SessionConfig,
        store: &'s mut FluencyStore<S>,
        rng_seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut sampler = QuestionSampler::new(rng_seed);
        let first = sampler
            .select_next(&config.selected_tables, store.data())
            .ok_or(ConfigError::NoTablesSelected)?;

        debug!(tables = ?config.selected_tables, length = config.session_length, "session started");

        Ok(SessionRunner {
            history: Vec::with_capacity(config.session_length),
            config,
            store,
            sampler,
            state: SessionState::AwaitingAnswer,
            current: first,
            presented_at: Instant::now(),
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The question on screen, `None` once complete.
    pub fn current_fact(&self) -> Option<Fact> {
        match self.state {
            SessionState::Complete => None,
            _ => Some(self.current),
        }
    }

    /// The fact whose correct answer must be retyped, if any. A caller can
    /// fetch hint text for it without holding up the session.
    pub fn pending_correction(&self) -> Option<Fact> {
        match self.state {
            SessionState::Correcting => Some(self.current),
            _ => None,
        }
    }

    pub fn history(&self) -> &[SessionAttempt] {
        &self.history
    }

    pub fn answered(&self) -> usize {
        self.history.len()
    }

    pub fn session_length(&self) -> usize {
        self.config.session_length
    }

    /// Fraction of the session answered, `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        (self.history.len() as f64 / self.config.session_length as f64).min(1.0)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Live performance data, including answers from this session.
    pub fn performance(&self) -> &PerformanceData {
        self.store.data()
    }

    /// Milliseconds since the current question was presented.
    pub fn elapsed_ms(&self) -> u64 {
        self.presented_at.elapsed().as_millis() as u64
    }

    /// Feed the text currently in the answer box.
    ///
    /// Submits automatically once the digit count reaches the length of the
    /// correct answer, timing the attempt from presentation.
    pub fn enter_input(&mut self, text: &str) -> AnswerOutcome {
        let text = text.trim();
        match self.state {
            SessionState::Complete => AnswerOutcome::SessionComplete,
            SessionState::Correcting => self.correct_with(text),
            SessionState::AwaitingAnswer => {
                let all_digits = !text.is_empty() && text.chars().all(|c| c.is_ascii_digit());
                if !all_digits || text.len() < self.current.answer_len() {
                    return AnswerOutcome::Incomplete;
                }
                let elapsed = self.elapsed_ms();
                self.submit_answer(text, elapsed)
            }
        }
    }

    /// Submit `text` explicitly with a measured response time.
    ///
    /// A string of digits too long to be any product is recorded as a miss
    /// with no parsed answer.
    pub fn submit_answer(&mut self, text: &str, time_taken_ms: u64) -> AnswerOutcome {
        let text = text.trim();
        match self.state {
            SessionState::Complete => AnswerOutcome::SessionComplete,
            SessionState::Correcting => self.correct_with(text),
            SessionState::AwaitingAnswer => {
                let value = match text.parse::<u64>() {
                    Ok(value) => Some(value),
                    Err(_) if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) => None,
                    Err(_) => return AnswerOutcome::Incomplete,
                };

                let attempt = SessionAttempt::new(self.current, value, time_taken_ms);
                self.history.push(attempt.clone());
                self.store.record(&attempt);

                if attempt.is_correct {
                    debug!(fact = %attempt.fact, ms = time_taken_ms, "correct");
                    self.advance();
                    AnswerOutcome::Correct(attempt)
                } else {
                    debug!(fact = %attempt.fact, answer = ?value, "incorrect, awaiting correction");
                    self.state = SessionState::Correcting;
                    AnswerOutcome::Incorrect(attempt)
                }
            }
        }
    }

    fn correct_with(&mut self, text: &str) -> AnswerOutcome {
        match text.parse::<u64>() {
            Ok(value) if value == self.current.product() => {
                self.advance();
                AnswerOutcome::Corrected
            }
            _ => AnswerOutcome::Incomplete,
        }
    }

    fn advance(&mut self) {
        if self.history.len() >= self.config.session_length {
            debug!(answered = self.history.len(), "session complete");
            self.state = SessionState::Complete;
            return;
        }

        match self.sampler.select_next(&self.config.selected_tables, self.store.data()) {
            Some(fact) => {
                self.current = fact;
                self.presented_at = Instant::now();
                self.state = SessionState::AwaitingAnswer;
            }
            // Unreachable with a validated config.
            None => self.state = SessionState::Complete,
        }
    }

    /// The full ordered history, once the session is complete.
    pub fn finish(self) -> Option<Vec<SessionAttempt>> {
        match self.state {
            SessionState::Complete => Some(self.history),
            _ => None,
        }
    }

    /// Whatever was answered so far, complete or not.
    pub fn into_history(self) -> Vec<SessionAttempt> {
        self.history
    }
}
