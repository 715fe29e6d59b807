use thiserror::Error;

/// A remote strategy could not produce a verdict.
///
/// Local strategies never fail; only lookups that leave the process end up
/// here. The checker decides whether one of these aborts the whole
/// classification (see [`crate::checker::FailurePolicy`]).
#[derive(Error, Debug)]
pub enum LookupFailure {
    #[error("spam lookup timed out")]
    Timeout,

    #[error("spam lookup transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("spam lookup returned HTTP {0}")]
    Status(u16),

    #[error("spam lookup returned a malformed body: {0}")]
    MalformedResponse(#[source] serde_json::Error),
}

// The request URL carries the address being checked, so it is stripped
// before the error can reach a log line.
impl From<reqwest::Error> for LookupFailure {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LookupFailure::Timeout
        } else {
            LookupFailure::Transport(e.without_url())
        }
    }
}
