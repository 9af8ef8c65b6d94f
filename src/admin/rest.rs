use async_trait::async_trait;
use reqwest::header::LOCATION;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use super::{AdminSession, KeycloakAdmin, NewUser, RealmScope, RealmSummary, UserSummary};
use crate::config::AdminCredentials;
use crate::error::{AdminError, AdminResult, ConfigError};

/// Token endpoint response. Only the access token is used; sessions are
/// never refreshed or reused.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// [`KeycloakAdmin`] over the Keycloak admin REST API.
#[derive(Debug, Clone)]
pub struct KeycloakRestClient {
    base_url: Url,
    client: Client,
}

impl KeycloakRestClient {
    pub fn new(base_url: Url) -> Result<Self, ConfigError> {
        Self::new_with_client(base_url, Client::new())
    }

    pub fn new_with_client(mut base_url: Url, client: Client) -> Result<Self, ConfigError> {
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl {
                value: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }
        base_url.set_query(None);
        base_url.set_fragment(None);
        Ok(Self { base_url, client })
    }

    /// Append percent-encoded `segments` to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn users_endpoint(&self, realm: &str) -> Url {
        self.endpoint(&["admin", "realms", realm, "users"])
    }
}

#[async_trait]
impl KeycloakAdmin for KeycloakRestClient {
    async fn authenticate(&self, credentials: &AdminCredentials) -> AdminResult<AdminSession> {
        let url = self.endpoint(&[
            "realms",
            &credentials.realm,
            "protocol",
            "openid-connect",
            "token",
        ]);
        debug!(realm = %credentials.realm, username = %credentials.username, "requesting admin token");

        let form = [
            ("grant_type", "password"),
            ("client_id", credentials.client_id.as_str()),
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ];
        let response = self.client.post(url).form(&form).send().await?;
        let token: TokenResponse = decode(ensure_success(response).await?).await?;
        Ok(AdminSession::new(token.access_token))
    }

    async fn list_realms(&self, session: &AdminSession) -> AdminResult<Vec<RealmSummary>> {
        let response = self
            .client
            .get(self.endpoint(&["admin", "realms"]))
            .bearer_auth(session.access_token())
            .send()
            .await?;
        decode(ensure_success(response).await?).await
    }

    async fn create_user(&self, scope: RealmScope<'_>, user: &NewUser) -> AdminResult<String> {
        debug!(realm = scope.realm, username = %user.username, "creating user");
        let response = self
            .client
            .post(self.users_endpoint(scope.realm))
            .bearer_auth(scope.session.access_token())
            .json(user)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .and_then(id_from_location)
            .ok_or(AdminError::MissingLocation)
    }

    async fn delete_user(&self, scope: RealmScope<'_>, user_id: &str) -> AdminResult<()> {
        debug!(realm = scope.realm, user_id, "deleting user");
        let mut url = self.users_endpoint(scope.realm);
        if let Ok(mut path) = url.path_segments_mut() {
            path.push(user_id);
        }
        let response = self
            .client
            .delete(url)
            .bearer_auth(scope.session.access_token())
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn list_users(&self, scope: RealmScope<'_>) -> AdminResult<Vec<UserSummary>> {
        let response = self
            .client
            .get(self.users_endpoint(scope.realm))
            .bearer_auth(scope.session.access_token())
            .send()
            .await?;
        decode(ensure_success(response).await?).await
    }
}

async fn ensure_success(response: Response) -> AdminResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(AdminError::Status {
        status: status.as_u16(),
        message: error_message(status, &body),
    })
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> AdminResult<T> {
    response
        .json()
        .await
        .map_err(|e| AdminError::Decode(e.to_string()))
}

/// Pull Keycloak's human-readable error out of a failure body.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["errorMessage", "error_description", "error"] {
            if let Some(message) = value.get(key).and_then(|v| v.as_str()) {
                return message.to_string();
            }
        }
    }

    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string()
    } else {
        body.to_string()
    }
}

/// Keycloak answers user creation with `Location: .../users/{id}`.
fn id_from_location(location: &str) -> Option<String> {
    let path = location.split(['?', '#']).next().unwrap_or_default();
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty() && *id != "users")
        .map(str::to_string)
}
