//! Ephemeral credential issuance
//!
//! The browser client never sees a long-lived secret: the session asks an
//! external issuer, authorized by a server-held key, for a short-lived
//! credential and opens the transport with that.

use async_trait::async_trait;
use serde_json::{json, Value};

use voice_sales_config::CredentialConfig;

use crate::SessionError;

/// A short-lived authorization token for one session.
#[derive(Clone)]
pub struct EphemeralCredential {
    secret: String,
}

impl EphemeralCredential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl std::fmt::Debug for EphemeralCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never log the secret itself.
        write!(f, "EphemeralCredential(****)")
    }
}

/// Issues ephemeral credentials for new sessions.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn issue(&self) -> Result<EphemeralCredential, SessionError>;
}

/// HTTP credential issuer.
///
/// POSTs to the configured endpoint; the response body must carry the
/// credential under `value`. Anything else is a credential failure.
pub struct HttpCredentialIssuer {
    client: reqwest::Client,
    issuer_url: String,
    api_key: String,
    model: String,
}

impl HttpCredentialIssuer {
    pub fn new(config: &CredentialConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            issuer_url: config.issuer_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl CredentialSource for HttpCredentialIssuer {
    async fn issue(&self) -> Result<EphemeralCredential, SessionError> {
        let response = self
            .client
            .post(&self.issuer_url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "session": {
                    "type": "realtime",
                    "model": self.model,
                }
            }))
            .send()
            .await
            .map_err(|e| SessionError::Credential(format!("issuer unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::Credential(format!(
                "issuer returned {status}"
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SessionError::Credential(format!("malformed issuer response: {e}")))?;

        parse_credential_body(&body)
    }
}

/// Extract the credential from an issuer response body.
pub(crate) fn parse_credential_body(body: &Value) -> Result<EphemeralCredential, SessionError> {
    body.get("value")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(EphemeralCredential::new)
        .ok_or_else(|| SessionError::Credential("issuer response missing 'value'".to_string()))
}

/// Credential source double for tests and local development.
pub struct StubCredentials {
    result: Result<String, String>,
}

impl StubCredentials {
    /// Always issues the given secret.
    pub fn ok(secret: impl Into<String>) -> Self {
        Self {
            result: Ok(secret.into()),
        }
    }

    /// Always fails issuance, as an issuer error would.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            result: Err(message.into()),
        }
    }
}

#[async_trait]
impl CredentialSource for StubCredentials {
    async fn issue(&self) -> Result<EphemeralCredential, SessionError> {
        match &self.result {
            Ok(secret) => Ok(EphemeralCredential::new(secret.clone())),
            Err(message) => Err(SessionError::Credential(message.clone())),
        }
    }
}
