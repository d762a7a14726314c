//! Personal access tokens under the profile security settings.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use vpsie_core::RequestContext;

use super::de::null_as_default;
use crate::{Result, VpsieClient};

const ACCESS_TOKEN_PATH: &str = "/apps/v2/profile/security/access/token";

/// A personal access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessToken {
    /// Token identifier.
    pub identifier: String,
    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Creation timestamp.
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_on: String,
    /// Expiration date.
    #[serde(default, deserialize_with = "null_as_default")]
    pub expiration_date: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateAccessTokenRequest<'a> {
    access_token_name: &'a str,
    access_token: &'a str,
    expiration_date: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateAccessTokenRequest<'a> {
    access_token_name: &'a str,
    expiration_date: &'a str,
}

/// Access token operations.
#[derive(Debug, Clone, Copy)]
pub struct AccessTokenService<'a> {
    client: &'a VpsieClient,
}

impl<'a> AccessTokenService<'a> {
    pub(crate) const fn new(client: &'a VpsieClient) -> Self {
        Self { client }
    }

    /// List access tokens.
    ///
    /// # Errors
    ///
    /// Returns [`vpsie_core::Error::Api`] on a non-2xx status, or
    /// [`vpsie_core::Error::DecodeFailure`] if an item does not match the model.
    pub async fn list(&self, ctx: &RequestContext) -> Result<Vec<AccessToken>> {
        self.client.fetch_list(ctx, ACCESS_TOKEN_PATH).await
    }

    /// Create an access token.
    ///
    /// # Errors
    ///
    /// Returns [`vpsie_core::Error::Api`] if the API rejects the request.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        name: &str,
        access_token: &str,
        expiration_date: &str,
    ) -> Result<()> {
        let request = CreateAccessTokenRequest {
            access_token_name: name,
            access_token,
            expiration_date,
        };
        self.client
            .send(ctx, Method::POST, ACCESS_TOKEN_PATH, Some(&request))
            .await
    }

    /// Rename a token or change its expiry.
    ///
    /// # Errors
    ///
    /// Returns [`vpsie_core::Error::Api`] if the API rejects the request.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        identifier: &str,
        name: &str,
        expiration_date: &str,
    ) -> Result<()> {
        let path = format!("{ACCESS_TOKEN_PATH}/{identifier}");
        let request = UpdateAccessTokenRequest {
            access_token_name: name,
            expiration_date,
        };
        self.client
            .send(ctx, Method::PUT, &path, Some(&request))
            .await
    }

    /// Revoke a token.
    ///
    /// # Errors
    ///
    /// Returns [`vpsie_core::Error::Api`] if the API rejects the request.
    pub async fn delete(&self, ctx: &RequestContext, identifier: &str) -> Result<()> {
        let path = format!("{ACCESS_TOKEN_PATH}/{identifier}");
        self.client
            .send::<()>(ctx, Method::DELETE, &path, None)
            .await
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
    async fn list_access_tokens() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/apps/v2/profile/security/access/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": false,
                "data": [{
                    "identifier": "t-1",
                    "name": "ci",
                    "created_on": "2024-01-01",
                    "expiration_date": "2025-01-01"
                }]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let tokens = client
            .access_tokens()
            .list(&RequestContext::background())
            .await
            .unwrap();
        assert_eq!(tokens[0].name, "ci");
    }

    #[tokio::test]
    async fn update_access_token_puts_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/apps/v2/profile/security/access/token/t-1"))
            .and(body_json(json!({
                "accessTokenName": "ci-renamed",
                "expirationDate": "2026-01-01"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": false})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client
            .access_tokens()
            .update(&RequestContext::background(), "t-1", "ci-renamed", "2026-01-01")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn create_and_delete_access_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/apps/v2/profile/security/access/token"))
            .and(body_json(json!({
                "accessTokenName": "ci",
                "accessToken": "tok",
                "expirationDate": "2026-01-01"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"error": false})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/apps/v2/profile/security/access/token/t-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let ctx = RequestContext::background();
        let tokens = client.access_tokens();
        tokens.create(&ctx, "ci", "tok", "2026-01-01").await.unwrap();
        tokens.delete(&ctx, "t-1").await.unwrap();
    }
}
