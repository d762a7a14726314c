//! API authentication.
//!
//! Login is the one endpoint whose success body is not wrapped in
//! `{error, data}`: the token sits under a `token` key instead.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use vpsie_core::RequestContext;

use crate::{Result, VpsieClient};

const LOGIN_PATH: &str = "/apps/v2/auth/from/api";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
}

/// Access and refresh tokens returned by a login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// Short-lived access token.
    pub access: TokenDetails,
    /// Refresh token.
    pub refresh: TokenDetails,
}

/// A single token and its expiry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenDetails {
    /// Token value.
    pub token: String,
    /// Expiry as reported by the API.
    pub expires: String,
}

#[derive(Deserialize)]
struct TokenRoot {
    token: Token,
}

/// Account operations.
#[derive(Debug, Clone, Copy)]
pub struct AccountService<'a> {
    client: &'a VpsieClient,
}

impl<'a> AccountService<'a> {
    pub(crate) const fn new(client: &'a VpsieClient) -> Self {
        Self { client }
    }

    /// Exchange client credentials for tokens.
    ///
    /// # Errors
    ///
    /// Returns [`vpsie_core::Error::Api`] if the credentials are rejected.
    pub async fn login(
        &self,
        ctx: &RequestContext,
        client_id: &str,
        client_secret: &str,
    ) -> Result<Token> {
        let credentials = LoginRequest {
            client_id,
            client_secret,
        };
        let root: TokenRoot = self
            .client
            .call(ctx, Method::POST, LOGIN_PATH, Some(&credentials))
            .await?;
        Ok(root.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::client_for;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn login_returns_token_pair() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/apps/v2/auth/from/api"))
            .and(body_json(json!({"clientId": "id", "clientSecret": "secret"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": false,
                "token": {
                    "access": {"token": "acc", "expires": "2026-01-01T00:00:00Z"},
                    "refresh": {"token": "ref", "expires": "2026-02-01T00:00:00Z"}
                }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let token = client
            .account()
            .login(&RequestContext::background(), "id", "secret")
            .await
            .unwrap();

        assert_eq!(token.access.token, "acc");
        assert_eq!(token.refresh.token, "ref");
    }

    #[tokio::test]
    async fn login_rejected_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/apps/v2/auth/from/api"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": true,
                "code": 401,
                "message": "Invalid credentials",
                "stack": ""
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .account()
            .login(&RequestContext::background(), "id", "wrong")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(reqwest::StatusCode::UNAUTHORIZED));
    }
}
