use crate::anonymize::loggable_email;
use crate::error::LookupFailure;
use crate::sink::{EventLevel, EventSink};
use crate::strategy::SpamStrategy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What the checker does when a strategy cannot produce a verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort the whole check and return the failure. No later strategy runs.
    #[default]
    FailFast,
    /// Record the failure and move on to the next strategy.
    Continue,
}

/// Runs an ordered list of strategies against one address.
///
/// Strategies are evaluated one at a time in the order given. The first one
/// that says "spam" ends the check and is named in an info event. A checker
/// is cheap to build: it only clones the `Arc`s it is handed.
pub struct Checker {
    strategies: Vec<Arc<dyn SpamStrategy>>,
    sink: Arc<dyn EventSink>,
    policy: FailurePolicy,
    redact: bool,
}

impl Checker {
    pub fn new(strategies: Vec<Arc<dyn SpamStrategy>>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            strategies,
            sink,
            policy: FailurePolicy::default(),
            redact: true,
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Whether addresses are masked in recorded events (on by default).
    pub fn with_redaction(mut self, redact: bool) -> Self {
        self.redact = redact;
        self
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub async fn is_spam(&self, email: &str) -> Result<bool, LookupFailure> {
        for strategy in &self.strategies {
            match strategy.classify(email).await {
                Ok(true) => {
                    self.sink.record(
                        EventLevel::Info,
                        &format!(
                            "Email {} detected as spam by {}",
                            loggable_email(email, self.redact),
                            strategy.name()
                        ),
                    );
                    return Ok(true);
                }
                Ok(false) => {
                    log::debug!("{}: no match", strategy.name());
                }
                Err(e) => match self.policy {
                    FailurePolicy::FailFast => {
                        self.sink.record(
                            EventLevel::Error,
                            &format!(
                                "Spam check aborted, strategy {} failed: {e}",
                                strategy.name()
                            ),
                        );
                        return Err(e);
                    }
                    FailurePolicy::Continue => {
                        self.sink.record(
                            EventLevel::Error,
                            &format!("Strategy {} failed, skipping: {e}", strategy.name()),
                        );
                    }
                },
            }
        }

        Ok(false)
    }
}
