pub mod pattern;
pub mod remote;

pub use pattern::PatternStrategy;
pub use remote::RemoteStrategy;

use crate::error::LookupFailure;
use async_trait::async_trait;

/// One interchangeable way of deciding whether an address is spam.
///
/// Implementations hold no mutable state, so a single instance can be shared
/// across concurrent checks behind an `Arc`. Failures are returned as-is; the
/// checker owns the policy for what a failure means.
#[async_trait]
pub trait SpamStrategy: Send + Sync {
    fn name(&self) -> &str;

    async fn classify(&self, email: &str) -> Result<bool, LookupFailure>;
}
