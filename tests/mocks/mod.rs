#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use mcp_keycloak_server::admin::{
    AdminSession, KeycloakAdmin, NewUser, RealmScope, RealmSummary, UserSummary,
};
use mcp_keycloak_server::config::AdminCredentials;
use mcp_keycloak_server::error::{AdminError, AdminResult};

/// One call made against the mock, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Authenticate { username: String, realm: String },
    ListRealms,
    CreateUser { realm: String, user: NewUser },
    DeleteUser { realm: String, user_id: String },
    ListUsers { realm: String },
}

/// In-memory admin API that records every call.
pub struct MockKeycloakAdmin {
    calls: Mutex<Vec<Call>>,
    realms: Mutex<Vec<String>>,
    users: Mutex<HashMap<String, Vec<UserSummary>>>, // realm -> users
    issued_tokens: Mutex<Vec<String>>,
    user_counter: Mutex<u32>,
    fail_auth: Mutex<bool>,
}

impl MockKeycloakAdmin {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            realms: Mutex::new(Vec::new()),
            users: Mutex::new(HashMap::new()),
            issued_tokens: Mutex::new(Vec::new()),
            user_counter: Mutex::new(0),
            fail_auth: Mutex::new(false),
        }
    }

    /// Mock preloaded with `master` and `acme`, where `acme` has two users.
    pub fn seeded() -> Self {
        let mock = Self::new();
        mock.add_realm("master");
        mock.add_realm("acme");
        mock.add_user("acme", "u-1", "alice");
        mock.add_user("acme", "u-2", "bob");
        mock
    }

    pub fn add_realm(&self, realm: &str) {
        self.realms.lock().unwrap().push(realm.to_string());
        self.users.lock().unwrap().entry(realm.to_string()).or_default();
    }

    pub fn add_user(&self, realm: &str, id: &str, username: &str) {
        self.users
            .lock()
            .unwrap()
            .entry(realm.to_string())
            .or_default()
            .push(UserSummary {
                id: id.to_string(),
                username: username.to_string(),
            });
    }

    pub fn set_fail_auth(&self, fail: bool) {
        *self.fail_auth.lock().unwrap() = fail;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(*c)).count()
    }

    pub fn users_in(&self, realm: &str) -> Vec<UserSummary> {
        self.users.lock().unwrap().get(realm).cloned().unwrap_or_default()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_session(&self, session: &AdminSession) -> AdminResult<()> {
        if self.issued_tokens.lock().unwrap().iter().any(|t| t == session.access_token()) {
            Ok(())
        } else {
            Err(status(401, "HTTP 401 Unauthorized"))
        }
    }

    fn realm_exists(&self, realm: &str) -> AdminResult<()> {
        if self.realms.lock().unwrap().iter().any(|r| r == realm) {
            Ok(())
        } else {
            Err(status(404, "Realm not found."))
        }
    }
}

fn status(status: u16, message: &str) -> AdminError {
    AdminError::Status {
        status,
        message: message.to_string(),
    }
}

pub fn admin_credentials() -> AdminCredentials {
    AdminCredentials {
        username: "admin".to_string(),
        password: "admin".to_string(),
        realm: "master".to_string(),
        client_id: "admin-cli".to_string(),
    }
}

#[async_trait]
impl KeycloakAdmin for MockKeycloakAdmin {
    async fn authenticate(&self, credentials: &AdminCredentials) -> AdminResult<AdminSession> {
        self.record(Call::Authenticate {
            username: credentials.username.clone(),
            realm: credentials.realm.clone(),
        });
        if *self.fail_auth.lock().unwrap() {
            return Err(status(401, "Invalid user credentials"));
        }

        let mut tokens = self.issued_tokens.lock().unwrap();
        let token = format!("token-{}", tokens.len() + 1);
        tokens.push(token.clone());
        Ok(AdminSession::new(token))
    }

    async fn list_realms(&self, session: &AdminSession) -> AdminResult<Vec<RealmSummary>> {
        self.record(Call::ListRealms);
        self.check_session(session)?;
        Ok(self
            .realms
            .lock()
            .unwrap()
            .iter()
            .map(|realm| RealmSummary { realm: realm.clone() })
            .collect())
    }

    async fn create_user(&self, scope: RealmScope<'_>, user: &NewUser) -> AdminResult<String> {
        self.record(Call::CreateUser {
            realm: scope.realm.to_string(),
            user: user.clone(),
        });
        self.check_session(scope.session)?;
        self.realm_exists(scope.realm)?;

        let mut users = self.users.lock().unwrap();
        let realm_users = users.entry(scope.realm.to_string()).or_default();
        if realm_users.iter().any(|u| u.username == user.username) {
            return Err(status(409, "User exists with same username"));
        }

        let mut counter = self.user_counter.lock().unwrap();
        *counter += 1;
        let id = format!("new-user-{counter}");
        realm_users.push(UserSummary {
            id: id.clone(),
            username: user.username.clone(),
        });
        Ok(id)
    }

    async fn delete_user(&self, scope: RealmScope<'_>, user_id: &str) -> AdminResult<()> {
        self.record(Call::DeleteUser {
            realm: scope.realm.to_string(),
            user_id: user_id.to_string(),
        });
        self.check_session(scope.session)?;
        self.realm_exists(scope.realm)?;

        let mut users = self.users.lock().unwrap();
        let realm_users = users.entry(scope.realm.to_string()).or_default();
        let before = realm_users.len();
        realm_users.retain(|u| u.id != user_id);
        if realm_users.len() == before {
            return Err(status(404, "User not found"));
        }
        Ok(())
    }

    async fn list_users(&self, scope: RealmScope<'_>) -> AdminResult<Vec<UserSummary>> {
        self.record(Call::ListUsers {
            realm: scope.realm.to_string(),
        });
        self.check_session(scope.session)?;
        self.realm_exists(scope.realm)?;
        Ok(self.users_in(scope.realm))
    }
}
