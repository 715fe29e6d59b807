use super::SpamStrategy;
use crate::error::LookupFailure;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Asks an external HTTP service whether an address is spam.
///
/// The service is called as `GET <endpoint>?email=<address>` and is expected
/// to answer with a JSON object carrying `isSpam`. Anything that prevents an
/// answer (timeout, transport error, non-2xx status, unparseable body) is a
/// [`LookupFailure`]; a well-formed body without a boolean `isSpam` counts as
/// "not spam".
#[derive(Debug, Clone)]
pub struct RemoteStrategy {
    name: String,
    endpoint: Url,
    client: Client,
}

impl RemoteStrategy {
    pub fn new(name: &str, endpoint: &str, timeout: Duration) -> anyhow::Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("invalid lookup endpoint for strategy '{name}'"))?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("spam-checker/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            name: name.to_string(),
            endpoint,
            client,
        })
    }

    /// Endpoint with the address appended as a URL-encoded `email` parameter.
    pub fn lookup_url(&self, email: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("email", email);
        url
    }
}

/// Pull the verdict out of a lookup response body.
fn parse_verdict(body: &[u8]) -> Result<bool, LookupFailure> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(LookupFailure::MalformedResponse)?;

    Ok(value
        .get("isSpam")
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false))
}

#[async_trait]
impl SpamStrategy for RemoteStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    async fn classify(&self, email: &str) -> Result<bool, LookupFailure> {
        let url = self.lookup_url(email);
        log::debug!("{}: querying lookup service at {}", self.name, self.endpoint);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            log::debug!("{}: lookup service answered {status}", self.name);
            return Err(LookupFailure::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        parse_verdict(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn strategy_for(server: &MockServer) -> RemoteStrategy {
        RemoteStrategy::new(
            "lookup",
            &format!("{}/spam-check-api", server.uri()),
            Duration::from_secs(2),
        )
        .unwrap()
    }

    #[test]
    fn test_lookup_url_encodes_email() {
        let strategy = RemoteStrategy::new(
            "lookup",
            "https://example.com/spam-check-api",
            Duration::from_secs(1),
        )
        .unwrap();

        let url = strategy.lookup_url("user+tag@test.com");
        assert_eq!(
            url.as_str(),
            "https://example.com/spam-check-api?email=user%2Btag%40test.com"
        );
    }

    #[test]
    fn test_lookup_url_keeps_existing_query() {
        let strategy = RemoteStrategy::new(
            "lookup",
            "https://example.com/check?key=abc",
            Duration::from_secs(1),
        )
        .unwrap();

        let url = strategy.lookup_url("a@b.co");
        assert_eq!(url.query(), Some("key=abc&email=a%40b.co"));
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        assert!(RemoteStrategy::new("lookup", "not a url", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_parse_verdict() {
        assert!(parse_verdict(br#"{"isSpam": true}"#).unwrap());
        assert!(!parse_verdict(br#"{"isSpam": false}"#).unwrap());
        assert!(!parse_verdict(br#"{"score": 0.9}"#).unwrap());
        assert!(!parse_verdict(br#"{"isSpam": "yes"}"#).unwrap());
        assert!(!parse_verdict(br#"[1, 2, 3]"#).unwrap());
        assert!(matches!(
            parse_verdict(b"<html>oops</html>"),
            Err(LookupFailure::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_verdict(b""),
            Err(LookupFailure::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_remote_reports_spam() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/spam-check-api"))
            .and(query_param("email", "bad@spam.example"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"isSpam": true}"#))
            .expect(1)
            .mount(&server)
            .await;

        let strategy = strategy_for(&server);
        assert!(strategy.classify("bad@spam.example").await.unwrap());
    }

    #[tokio::test]
    async fn test_remote_missing_field_is_not_spam() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status": "ok"}"#))
            .mount(&server)
            .await;

        let strategy = strategy_for(&server);
        assert!(!strategy.classify("clean@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_remote_server_error_is_lookup_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let strategy = strategy_for(&server);
        let err = strategy.classify("clean@example.com").await.unwrap_err();
        assert!(matches!(err, LookupFailure::Status(500)));
    }

    #[tokio::test]
    async fn test_remote_malformed_body_is_lookup_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("definitely not json"))
            .mount(&server)
            .await;

        let strategy = strategy_for(&server);
        let err = strategy.classify("clean@example.com").await.unwrap_err();
        assert!(matches!(err, LookupFailure::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_remote_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"isSpam": true}"#)
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let strategy = RemoteStrategy::new(
            "slow",
            &format!("{}/spam-check-api", server.uri()),
            Duration::from_millis(200),
        )
        .unwrap();

        let err = strategy.classify("slow@example.com").await.unwrap_err();
        assert!(matches!(err, LookupFailure::Timeout));
    }

    #[tokio::test]
    async fn test_remote_unreachable() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let strategy = RemoteStrategy::new(
            "gone",
            &format!("http://127.0.0.1:{port}/check"),
            Duration::from_secs(2),
        )
        .unwrap();
        let err = strategy.classify("any@example.com").await.unwrap_err();
        assert!(matches!(
            err,
            LookupFailure::Transport(_) | LookupFailure::Timeout
        ));
    }

    #[tokio::test]
    async fn test_remote_is_idempotent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"isSpam": false}"#))
            .expect(2)
            .mount(&server)
            .await;

        let strategy = strategy_for(&server);
        let first = strategy.classify("repeat@example.com").await.unwrap();
        let second = strategy.classify("repeat@example.com").await.unwrap();
        assert_eq!(first, second);
    }
}
