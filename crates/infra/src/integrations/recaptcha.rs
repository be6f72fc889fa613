//! Google reCAPTCHA server-side verification (v2 and v3)

use helpkit_domain::{HelpkitError, RecaptchaConfig, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::http::HttpClient;

/// Body returned by the `siteverify` endpoint
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecaptchaResponse {
    pub success: bool,
    /// v3 only: 0.0 (bot) to 1.0 (human)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// v3 only: action name given to `grecaptcha.execute`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge_ts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, rename = "error-codes")]
    pub error_codes: Vec<String>,
}

impl RecaptchaResponse {
    /// Whether this response should be trusted
    ///
    /// A missing score (v2 checkbox) only requires `success`. A given
    /// `expected_action` must match exactly.
    pub fn passes(&self, min_score: f64, expected_action: Option<&str>) -> bool {
        if !self.success {
            return false;
        }
        if self.score.is_some_and(|score| score < min_score) {
            return false;
        }
        match expected_action {
            Some(expected) => self.action.as_deref() == Some(expected),
            None => true,
        }
    }
}

/// Verifies user tokens against the configured `siteverify` endpoint
pub struct RecaptchaVerifier {
    http_client: HttpClient,
    config: RecaptchaConfig,
}

impl RecaptchaVerifier {
    /// Build a verifier with its own HTTP client using the configured timeout.
    pub fn new(config: RecaptchaConfig) -> Result<Self> {
        let http_client = HttpClient::builder().timeout_secs(config.timeout_seconds).build()?;
        Ok(Self::with_client(config, http_client))
    }

    pub fn with_client(config: RecaptchaConfig, http_client: HttpClient) -> Self {
        Self { http_client, config }
    }

    /// Ask Google about `token`
    ///
    /// # Errors
    /// - `Config` when no secret is configured
    /// - `InvalidInput` for an empty token
    /// - `Network` / `Serialization` when the endpoint cannot be reached or
    ///   answers with something else than the documented JSON
    pub async fn verify(&self, token: &str, remote_ip: Option<&str>) -> Result<RecaptchaResponse> {
        let secret = self
            .config
            .secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| HelpkitError::Config("reCAPTCHA secret is not configured".into()))?;

        let token = token.trim();
        if token.is_empty() {
            return Err(HelpkitError::InvalidInput("reCAPTCHA token is empty".into()));
        }

        let mut form = vec![("secret", secret), ("response", token)];
        if let Some(ip) = remote_ip.filter(|ip| !ip.is_empty()) {
            form.push(("remoteip", ip));
        }

        let request = self.http_client.request(Method::POST, &self.config.endpoint).form(&form);
        let response: RecaptchaResponse = self.http_client.send_json(request).await?;

        debug!(
            success = response.success,
            score = ?response.score,
            action = ?response.action,
            errors = ?response.error_codes,
            "reCAPTCHA verification answered"
        );

        Ok(response)
    }

    /// `true` only for a successful verification meeting the configured score
    ///
    /// Never fails: an empty token is rejected without a request, and any
    /// error reaching the service is logged and treated as a bot.
    pub async fn is_human(
        &self,
        token: &str,
        remote_ip: Option<&str>,
        expected_action: Option<&str>,
    ) -> bool {
        if token.trim().is_empty() {
            return false;
        }

        match self.verify(token, remote_ip).await {
            Ok(response) => response.passes(self.config.min_score, expected_action),
            Err(err) => {
                warn!(error = %err, "reCAPTCHA verification failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn verifier(server: &MockServer) -> RecaptchaVerifier {
        let config = RecaptchaConfig {
            secret: Some("test-secret".into()),
            endpoint: format!("{}/siteverify", server.uri()),
            ..RecaptchaConfig::default()
        };
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(5))
            .max_attempts(1)
            .build()
            .expect("http client");
        RecaptchaVerifier::with_client(config, http_client)
    }

    #[test]
    fn passes_checks_score_and_action() {
        let v2 = RecaptchaResponse { success: true, ..Default::default() };
        assert!(v2.passes(0.5, None));

        let v3 = RecaptchaResponse {
            success: true,
            score: Some(0.7),
            action: Some("login".into()),
            ..Default::default()
        };
        assert!(v3.passes(0.5, Some("login")));
        assert!(!v3.passes(0.8, Some("login")));
        assert!(!v3.passes(0.5, Some("signup")));

        let failed = RecaptchaResponse { success: false, score: Some(0.9), ..Default::default() };
        assert!(!failed.passes(0.1, None));
    }

    #[tokio::test]
    async fn verify_posts_form_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/siteverify"))
            .and(body_string_contains("secret=test-secret"))
            .and(body_string_contains("response=tok-123"))
            .and(body_string_contains("remoteip=203.0.113.7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "score": 0.9,
                "action": "contact",
                "hostname": "example.fr",
                "challenge_ts": "2025-03-01T10:00:00Z"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = verifier(&server).verify("tok-123", Some("203.0.113.7")).await.unwrap();
        assert!(response.success);
        assert_eq!(response.score, Some(0.9));
        assert_eq!(response.hostname.as_deref(), Some("example.fr"));
    }

    #[tokio::test]
    async fn verify_requires_secret() {
        let server = MockServer::start().await;
        let mut verifier = verifier(&server);
        verifier.config.secret = None;

        let err = verifier.verify("tok", None).await.unwrap_err();
        assert!(matches!(err, HelpkitError::Config(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn is_human_rejects_low_scores_and_error_codes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("response=bot"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"success": true, "score": 0.1})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_string_contains("response=stale"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error-codes": ["timeout-or-duplicate"]
            })))
            .mount(&server)
            .await;

        let verifier = verifier(&server);
        assert!(!verifier.is_human("bot", None, None).await);
        assert!(!verifier.is_human("stale", None, None).await);
        assert!(!verifier.is_human("   ", None, None).await);
    }

    #[tokio::test]
    async fn is_human_treats_service_errors_as_bots() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        assert!(!verifier(&server).is_human("tok", None, None).await);
    }
}
