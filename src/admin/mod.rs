//! Keycloak admin API port.
//!
//! Handlers only see [`KeycloakAdmin`]. There is no shared "active realm":
//! each invocation authenticates into a fresh [`AdminSession`] and narrows it
//! to a target realm with [`AdminSession::in_realm`].

mod rest;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::AdminCredentials;
use crate::error::AdminResult;

pub use rest::KeycloakRestClient;

/// Bearer token obtained by one password grant.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminSession {
    access_token: String,
}

impl AdminSession {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Scope this session to `realm` for realm-level operations.
    pub fn in_realm<'a>(&'a self, realm: &'a str) -> RealmScope<'a> {
        RealmScope {
            session: self,
            realm,
        }
    }
}

impl fmt::Debug for AdminSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminSession").finish_non_exhaustive()
    }
}

/// An authenticated session targeting one realm.
#[derive(Debug, Clone, Copy)]
pub struct RealmScope<'a> {
    pub session: &'a AdminSession,
    pub realm: &'a str,
}

/// User payload for creation. New users are always enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub enabled: bool,
}

/// The parts of a Keycloak realm representation this server reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RealmSummary {
    pub realm: String,
}

/// The parts of a Keycloak user representation this server reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
}

/// Admin operations against an identity provider.
#[async_trait]
pub trait KeycloakAdmin: Send + Sync {
    /// Password grant against the admin realm.
    async fn authenticate(&self, credentials: &AdminCredentials) -> AdminResult<AdminSession>;

    async fn list_realms(&self, session: &AdminSession) -> AdminResult<Vec<RealmSummary>>;

    /// Returns the id Keycloak assigned to the new user.
    async fn create_user(&self, scope: RealmScope<'_>, user: &NewUser) -> AdminResult<String>;

    async fn delete_user(&self, scope: RealmScope<'_>, user_id: &str) -> AdminResult<()>;

    async fn list_users(&self, scope: RealmScope<'_>) -> AdminResult<Vec<UserSummary>>;
}
