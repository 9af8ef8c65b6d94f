use std::fmt;

use reqwest::Url;

use crate::error::ConfigError;

const DEFAULT_KEYCLOAK_URL: &str = "http://localhost:8080";
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin";
const DEFAULT_ADMIN_REALM: &str = "master";
const DEFAULT_ADMIN_CLIENT_ID: &str = "admin-cli";

/// Credentials used for the password grant that opens every admin session.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
    /// Realm the admin account lives in. Independent of the realm a tool targets.
    pub realm: String,
    pub client_id: String,
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("realm", &self.realm)
            .field("client_id", &self.client_id)
            .finish()
    }
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub keycloak_url: Url,
    pub credentials: AdminCredentials,
}

impl ServerConfig {
    /// Load configuration from environment.
    ///
    /// - `KEYCLOAK_URL` (default `http://localhost:8080`) - base URL of the Keycloak server
    /// - `KEYCLOAK_ADMIN` (default `admin`) - admin username
    /// - `KEYCLOAK_ADMIN_PASSWORD` (default `admin`) - admin password
    /// - `KEYCLOAK_ADMIN_REALM` (default `master`) - realm holding the admin account
    /// - `KEYCLOAK_ADMIN_CLIENT_ID` (default `admin-cli`) - client used for the password grant
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`], reading values through `lookup`.
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let raw_url = var("KEYCLOAK_URL", DEFAULT_KEYCLOAK_URL);
        let keycloak_url = Url::parse(&raw_url).map_err(|e| ConfigError::InvalidUrl {
            value: raw_url.clone(),
            reason: e.to_string(),
        })?;
        if keycloak_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl {
                value: raw_url,
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        Ok(Self {
            keycloak_url,
            credentials: AdminCredentials {
                username: var("KEYCLOAK_ADMIN", DEFAULT_ADMIN_USERNAME),
                password: var("KEYCLOAK_ADMIN_PASSWORD", DEFAULT_ADMIN_PASSWORD),
                realm: var("KEYCLOAK_ADMIN_REALM", DEFAULT_ADMIN_REALM),
                client_id: var("KEYCLOAK_ADMIN_CLIENT_ID", DEFAULT_ADMIN_CLIENT_ID),
            },
        })
    }
}
