pub mod anonymize;
pub mod checker;
pub mod config;
pub mod error;
pub mod server;
pub mod sink;
pub mod strategy;
pub mod validation;

pub use checker::{Checker, FailurePolicy};
pub use config::{Config, StrategyConfig};
pub use error::LookupFailure;
pub use sink::{EventLevel, EventSink, LogSink};
pub use strategy::{PatternStrategy, RemoteStrategy, SpamStrategy};
