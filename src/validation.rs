//! Typed argument validation for each tool.
//!
//! Validation is pure: raw JSON arguments in, a typed [`ToolRequest`] or
//! the complete list of violations out. Nothing here touches the network.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::tools::Tool;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    pub realm: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteUserRequest {
    pub realm: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListUsersRequest {
    pub realm: String,
}

/// A validated tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolRequest {
    CreateUser(CreateUserRequest),
    DeleteUser(DeleteUserRequest),
    ListRealms,
    ListUsers(ListUsersRequest),
}

impl ToolRequest {
    pub fn tool(&self) -> Tool {
        match self {
            ToolRequest::CreateUser(_) => Tool::CreateUser,
            ToolRequest::DeleteUser(_) => Tool::DeleteUser,
            ToolRequest::ListRealms => Tool::ListRealms,
            ToolRequest::ListUsers(_) => Tool::ListUsers,
        }
    }
}

/// One failed check, addressed by argument path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub reason: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

/// Every violation found in one set of arguments. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    /// Whether any violation is addressed at `path`.
    pub fn mentions(&self, path: &str) -> bool {
        self.0.iter().any(|v| v.path == path)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(Violation::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "Invalid arguments: {joined}")
    }
}

/// Validate `arguments` for `tool`. Absent arguments are treated as `{}`.
pub fn validate(tool: Tool, arguments: Option<&Value>) -> Result<ToolRequest, ValidationErrors> {
    let empty = Map::new();
    let object = match arguments {
        None | Some(Value::Null) => &empty,
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(ValidationErrors(vec![Violation {
                path: "arguments".into(),
                reason: format!("Expected object, received {}", json_type(other)),
            }]));
        }
    };

    let mut fields = Fields::new(object);
    let request = match tool {
        Tool::CreateUser => {
            let realm = fields.path_segment("realm");
            let username = fields.string("username");
            let email = fields.email("email");
            let first_name = fields.string("firstName");
            let last_name = fields.string("lastName");
            fields.finish()?;
            ToolRequest::CreateUser(CreateUserRequest {
                realm,
                username,
                email,
                first_name,
                last_name,
            })
        }
        Tool::DeleteUser => {
            let realm = fields.path_segment("realm");
            let user_id = fields.path_segment("userId");
            fields.finish()?;
            ToolRequest::DeleteUser(DeleteUserRequest { realm, user_id })
        }
        Tool::ListRealms => ToolRequest::ListRealms,
        Tool::ListUsers => {
            let realm = fields.path_segment("realm");
            fields.finish()?;
            ToolRequest::ListUsers(ListUsersRequest { realm })
        }
    };
    Ok(request)
}

/// Field reader that records violations instead of stopping at the first one.
struct Fields<'a> {
    object: &'a Map<String, Value>,
    violations: Vec<Violation>,
}

impl<'a> Fields<'a> {
    fn new(object: &'a Map<String, Value>) -> Self {
        Self {
            object,
            violations: Vec::new(),
        }
    }

    fn reject(&mut self, path: &str, reason: impl Into<String>) -> String {
        self.violations.push(Violation {
            path: path.to_string(),
            reason: reason.into(),
        });
        String::new()
    }

    /// A required, non-empty string.
    fn string(&mut self, key: &str) -> String {
        let object = self.object;
        match object.get(key) {
            None | Some(Value::Null) => self.reject(key, "Required"),
            Some(Value::String(s)) if s.is_empty() => self.reject(key, "Must not be empty"),
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                let reason = format!("Expected string, received {}", json_type(other));
                self.reject(key, reason)
            }
        }
    }

    /// A string that becomes one URL path segment. `.` and `..` would be
    /// collapsed by URL normalization, so they are refused here.
    fn path_segment(&mut self, key: &str) -> String {
        let before = self.violations.len();
        let value = self.string(key);
        if self.violations.len() == before && (value == "." || value == "..") {
            return self.reject(key, "Must not be a relative path segment");
        }
        value
    }

    fn email(&mut self, key: &str) -> String {
        let before = self.violations.len();
        let value = self.string(key);
        if self.violations.len() == before && !is_email(&value) {
            return self.reject(key, "Invalid email");
        }
        value
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.violations))
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
            .expect("email pattern is valid")
    })
}

/// `local@domain.tld`: local part of `[A-Za-z0-9_'+-.]` without a leading dot,
/// trailing dot or `..`; hyphenated alphanumeric domain labels; alphabetic
/// TLD of at least two letters.
pub fn is_email(candidate: &str) -> bool {
    !candidate.starts_with('.') && !candidate.contains("..") && email_pattern().is_match(candidate)
}
