/// Severity of an event recorded by the checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    Info,
    Error,
}

/// Destination for detection and failure events.
///
/// The checker never talks to a global logger directly; whoever assembles it
/// hands in a sink. The binary uses [`LogSink`], tests use a recording sink.
pub trait EventSink: Send + Sync {
    fn record(&self, level: EventLevel, message: &str);
}

/// Forwards events to the `log` facade.
#[derive(Debug, Clone)]
pub struct LogSink {
    target: String,
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink {
    pub fn new() -> Self {
        Self::with_target("spam_checker")
    }

    pub fn with_target(target: &str) -> Self {
        Self {
            target: target.to_string(),
        }
    }
}

impl EventSink for LogSink {
    fn record(&self, level: EventLevel, message: &str) {
        let level = match level {
            EventLevel::Info => log::Level::Info,
            EventLevel::Error => log::Level::Error,
        };
        log::log!(target: self.target.as_str(), level, "{message}");
    }
}
