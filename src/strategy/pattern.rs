use super::SpamStrategy;
use crate::error::LookupFailure;
use async_trait::async_trait;
use regex::Regex;

/// Flags an address when any configured regular expression matches it.
///
/// Patterns are tried in the order given and evaluation stops at the first
/// hit, so cheap or likely patterns belong at the front.
#[derive(Debug, Clone)]
pub struct PatternStrategy {
    name: String,
    patterns: Vec<Regex>,
}

impl PatternStrategy {
    pub fn new<S: AsRef<str>>(name: &str, patterns: &[S]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: name.to_string(),
            patterns,
        })
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// First pattern matching `email`, if any.
    pub fn first_match(&self, email: &str) -> Option<&Regex> {
        self.patterns.iter().find(|re| re.is_match(email))
    }

    pub fn matches(&self, email: &str) -> bool {
        self.first_match(email).is_some()
    }
}

#[async_trait]
impl SpamStrategy for PatternStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    async fn classify(&self, email: &str) -> Result<bool, LookupFailure> {
        match self.first_match(email) {
            Some(re) => {
                log::debug!("{}: pattern '{}' matched", self.name, re.as_str());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
