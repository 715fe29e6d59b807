use crate::checker::FailurePolicy;
use crate::strategy::remote::DEFAULT_TIMEOUT_SECONDS;
use crate::strategy::{PatternStrategy, RemoteStrategy, SpamStrategy};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    #[serde(default = "default_redact")]
    pub redact_emails: bool,
    #[serde(default)]
    pub log_file: Option<String>,
    /// Evaluated in the order listed.
    pub strategies: Vec<StrategyConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StrategyConfig {
    Pattern {
        name: String,
        patterns: Vec<String>,
    },
    Remote {
        name: String,
        endpoint: String,
        timeout_seconds: Option<u64>,
    },
}

fn default_listen() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_redact() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen: default_listen(),
            failure_policy: FailurePolicy::FailFast,
            redact_emails: true,
            log_file: None,
            strategies: vec![
                StrategyConfig::Pattern {
                    name: "local-patterns".to_string(),
                    patterns: vec!["spam-pattern".to_string(), "another-pattern".to_string()],
                },
                StrategyConfig::Remote {
                    name: "lookup-api".to_string(),
                    endpoint: "https://example.com/spam-check-api".to_string(),
                    timeout_seconds: Some(DEFAULT_TIMEOUT_SECONDS),
                },
            ],
        }
    }
}

impl StrategyConfig {
    pub fn name(&self) -> &str {
        match self {
            StrategyConfig::Pattern { name, .. } | StrategyConfig::Remote { name, .. } => name,
        }
    }

    pub fn build(&self) -> anyhow::Result<Arc<dyn SpamStrategy>> {
        match self {
            StrategyConfig::Pattern { name, patterns } => {
                let strategy = PatternStrategy::new(name, patterns.as_slice())
                    .with_context(|| format!("invalid pattern in strategy '{name}'"))?;
                Ok(Arc::new(strategy))
            }
            StrategyConfig::Remote {
                name,
                endpoint,
                timeout_seconds,
            } => {
                let timeout =
                    Duration::from_secs(timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS));
                Ok(Arc::new(RemoteStrategy::new(name, endpoint, timeout)?))
            }
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {path}"))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse {path}"))?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self).context("failed to serialize configuration")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {path}"))?;
        Ok(())
    }

    /// Compile every configured strategy, in order. Fails on the first
    /// invalid pattern or endpoint.
    pub fn build_strategies(&self) -> anyhow::Result<Vec<Arc<dyn SpamStrategy>>> {
        let mut seen = std::collections::HashSet::new();
        for strategy in &self.strategies {
            if !seen.insert(strategy.name()) {
                anyhow::bail!("duplicate strategy name '{}'", strategy.name());
            }
        }

        self.strategies.iter().map(StrategyConfig::build).collect()
    }
}
