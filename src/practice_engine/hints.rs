//! Explanatory hint text for a missed fact.
//!
//! Hints come from a pluggable [`HintProvider`] (a tutoring service, a local
//! model, or the built-in [`StrategyHints`]). The [`HintService`] wrapping it
//! never fails: when no provider is configured, when the provider errors, or
//! when it takes longer than the configured timeout, a deterministic fallback
//! built from `a`, `b` and the product is returned instead.
//!
//! Hints are requested after the missed attempt has been recorded, so their
//! latency never affects response timing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::practice_engine::models::Fact;

/// Default upper bound on how long a provider may take.
pub const DEFAULT_HINT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum HintError {
    #[error("hint provider unavailable: {0}")]
    Unavailable(String),

    #[error("hint provider returned an empty hint")]
    Empty,

    #[error("hint request timed out after {0:?}")]
    Timeout(Duration),
}

/// Anything that can explain a multiplication fact.
#[async_trait]
pub trait HintProvider: Send + Sync {
    /// Human-readable provider name, used in logs.
    fn name(&self) -> &str;

    async fn hint(&self, fact: Fact) -> Result<String, HintError>;
}

// ---------------------------------------------------------------------------
// Fallback text
// ---------------------------------------------------------------------------

/// Text used when hints are switched off: break the fact around `a × 10`.
pub fn disabled_fallback(fact: Fact) -> String {
    let (a, b) = (fact.a as u64, fact.b as u64);
    let tens = a * 10;
    let product = fact.product();
    if b <= 10 {
        let gap = 10 - b;
        format!(
            "Let's break it down. You know that {a} x 10 is {tens}. \
             Since {b} is {gap} less than 10, take away {gap} lots of {a} from {tens}. \
             So, {tens} - {} = {product}.",
            a * gap
        )
    } else {
        let extra = b - 10;
        format!(
            "Let's break it down. You know that {a} x 10 is {tens}. \
             Since {b} is {extra} more than 10, add {extra} more lots of {a} to {tens}. \
             So, {tens} + {} = {product}.",
            a * extra
        )
    }
}

/// Text used when the provider failed.
pub fn error_fallback(fact: Fact) -> String {
    format!(
        "There was an error getting a hint. Let's try another way: {a} + {a} + ... ({b} times) = {p}",
        a = fact.a,
        b = fact.b,
        p = fact.product()
    )
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Fail-open front for an optional [`HintProvider`].
#[derive(Clone)]
pub struct HintService {
    provider: Option<Arc<dyn HintProvider>>,
    timeout: Duration,
}

impl HintService {
    pub fn new(provider: Arc<dyn HintProvider>) -> Self {
        Self { provider: Some(provider), timeout: DEFAULT_HINT_TIMEOUT }
    }

    /// A service that always answers with [`disabled_fallback`].
    pub fn disabled() -> Self {
        Self { provider: None, timeout: DEFAULT_HINT_TIMEOUT }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Hint text for `fact`. Always returns something to show.
    pub async fn get_hint(&self, fact: Fact) -> String {
        let Some(provider) = &self.provider else {
            return disabled_fallback(fact);
        };

        let result = match tokio::time::timeout(self.timeout, provider.hint(fact)).await {
            Ok(Ok(text)) if text.trim().is_empty() => Err(HintError::Empty),
            Ok(result) => result,
            Err(_) => Err(HintError::Timeout(self.timeout)),
        };

        match result {
            Ok(text) => text,
            Err(e) => {
                warn!(provider = provider.name(), fact = %fact, "hint failed: {e}");
                error_fallback(fact)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Built-in offline strategies
// ---------------------------------------------------------------------------

/// Offline provider that picks a memory strategy from the operands.
///
/// Prefers a trick keyed on either operand (×0, ×1, ×2, ×4, ×5, ×9, ×10, ×11),
/// then squares, then a break-apart around 5.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrategyHints;

impl StrategyHints {
    /// Strategy text for `fact`, computed synchronously.
    pub fn explain(fact: Fact) -> String {
        let (a, b) = (fact.a as u64, fact.b as u64);
        let p = fact.product();

        // Put the operand with a known trick in `k`, the other in `n`.
        let tricks = [0u64, 1, 10, 2, 5, 9, 11, 4];
        let picked = tricks
            .iter()
            .find_map(|&t| if a == t { Some((a, b)) } else if b == t { Some((b, a)) } else { None });

        if let Some((k, n)) = picked {
            return match k {
                0  => format!("Anything times 0 is 0, so {n} x 0 is {p}."),
                1  => format!("Anything times 1 stays the same, so {n} x 1 is just {n}."),
                10 => format!("Times 10 just puts a zero on the end: {n} becomes {p}."),
                2  => format!("Times 2 is doubling. Double {n} and you get {p}."),
                5  => format!(
                    "Times 5 is half of times 10. {n} x 10 is {}, and half of that is {p}.",
                    n * 10
                ),
                9  => format!(
                    "Anything times 9 is 10 times that number, minus the number. \
                     So {n} x 9 is {} - {n}, which is {p}.",
                    n * 10
                ),
                11 => format!(
                    "Times 11 is times 10 plus one more. {n} x 10 is {}, add {n} more to get {p}.",
                    n * 10
                ),
                _  => format!(
                    "Times 4 is double, then double again. Double {n} is {}, double that is {p}.",
                    n * 2
                ),
            };
        }

        if a == b {
            return format!(
                "{a} x {a} is a square number. Picture a {a} by {a} grid of dots: {p} in all."
            );
        }

        // Break the larger operand into 5 + rest.
        let (big, small) = if a >= b { (a, b) } else { (b, a) };
        let rest = big - 5;
        format!(
            "You can break it down. You might know {small} x 5 is {}. \
             You just need {rest} more lots of {small}, which is {}. So {} + {} = {p}.",
            small * 5,
            small * rest,
            small * 5,
            small * rest
        )
    }
}

#[async_trait]
impl HintProvider for StrategyHints {
    fn name(&self) -> &str {
        "strategy"
    }

    async fn hint(&self, fact: Fact) -> Result<String, HintError> {
        Ok(Self::explain(fact))
    }
}
