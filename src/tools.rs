//! Tool catalog.
//!
//! [`Tool`] is the single source of truth for what this server can do:
//! `tools/list` is rendered from [`Tool::ALL`] and `tools/call` resolves
//! names through [`Tool::from_name`], so the two cannot disagree.

use serde::Serialize;
use serde_json::{json, Value};

/// Every tool exposed over MCP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    CreateUser,
    DeleteUser,
    ListRealms,
    ListUsers,
}

/// Tool metadata as advertised by `tools/list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

impl Tool {
    /// Catalog order.
    pub const ALL: [Tool; 4] = [
        Tool::CreateUser,
        Tool::DeleteUser,
        Tool::ListRealms,
        Tool::ListUsers,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tool::CreateUser => "create-user",
            Tool::DeleteUser => "delete-user",
            Tool::ListRealms => "list-realms",
            Tool::ListUsers => "list-users",
        }
    }

    pub fn from_name(name: &str) -> Option<Tool> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            Tool::CreateUser => "Create a new user in a specific realm",
            Tool::DeleteUser => "Delete a user from a specific realm",
            Tool::ListRealms => "List all available realms",
            Tool::ListUsers => "List users in a specific realm",
        }
    }

    /// Whether the tool operates inside a caller-chosen realm.
    pub fn is_realm_scoped(self) -> bool {
        !matches!(self, Tool::ListRealms)
    }

    pub fn input_schema(self) -> Value {
        match self {
            Tool::CreateUser => json!({
                "type": "object",
                "properties": {
                    "realm": { "type": "string" },
                    "username": { "type": "string" },
                    "email": { "type": "string", "format": "email" },
                    "firstName": { "type": "string" },
                    "lastName": { "type": "string" }
                },
                "required": ["realm", "username", "email", "firstName", "lastName"]
            }),
            Tool::DeleteUser => json!({
                "type": "object",
                "properties": {
                    "realm": { "type": "string" },
                    "userId": { "type": "string" }
                },
                "required": ["realm", "userId"]
            }),
            Tool::ListRealms => json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
            Tool::ListUsers => json!({
                "type": "object",
                "properties": {
                    "realm": { "type": "string" }
                },
                "required": ["realm"]
            }),
        }
    }

    pub fn descriptor(self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name(),
            description: self.description(),
            input_schema: self.input_schema(),
        }
    }
}

/// The full catalog, in [`Tool::ALL`] order.
pub fn list_tools() -> Vec<ToolDescriptor> {
    Tool::ALL.into_iter().map(Tool::descriptor).collect()
}
