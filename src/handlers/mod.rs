pub mod create_user;
pub mod delete_user;
pub mod list_realms;
pub mod list_users;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::admin::{KeycloakAdmin, KeycloakRestClient};
use crate::config::{AdminCredentials, ServerConfig};
use crate::error::{ConfigError, DispatchError};
use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, ToolCallParams, ToolResult};
use crate::tools::{self, Tool};
use crate::validation::{self, ToolRequest};

/// Everything a tool call needs: admin credentials and the admin API handle.
#[derive(Clone)]
pub struct ServerContext {
    pub credentials: AdminCredentials,
    pub admin: Arc<dyn KeycloakAdmin>,
}

impl ServerContext {
    pub fn new(credentials: AdminCredentials, admin: Arc<dyn KeycloakAdmin>) -> Self {
        Self { credentials, admin }
    }

    /// Context backed by the Keycloak REST API at `config.keycloak_url`.
    pub fn from_config(config: &ServerConfig) -> Result<Self, ConfigError> {
        let admin = KeycloakRestClient::new(config.keycloak_url.clone())?;
        Ok(Self::new(config.credentials.clone(), Arc::new(admin)))
    }
}

/// Dispatch a JSON-RPC request to the appropriate handler.
///
/// Returns `None` for notifications (no response required).
pub async fn dispatch(req: &JsonRpcRequest, ctx: &ServerContext) -> Option<JsonRpcResponse> {
    if req.method.starts_with("notifications/") {
        return None;
    }

    match req.method.as_str() {
        "initialize" => {
            let result = serde_json::json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": "keycloak-admin",
                    "version": env!("CARGO_PKG_VERSION")
                }
            });
            Some(JsonRpcResponse::success(req.id.clone(), result))
        }

        "ping" => Some(JsonRpcResponse::success(req.id.clone(), serde_json::json!({}))),

        "tools/list" => {
            let result = serde_json::json!({ "tools": tools::list_tools() });
            Some(JsonRpcResponse::success(req.id.clone(), result))
        }

        "tools/call" => {
            let params: ToolCallParams = match &req.params {
                Some(v) => match serde_json::from_value(v.clone()) {
                    Ok(p) => p,
                    Err(e) => {
                        return Some(JsonRpcResponse::error(
                            req.id.clone(),
                            JsonRpcError::invalid_params(format!(
                                "Invalid tools/call params: {e}"
                            )),
                        ));
                    }
                },
                None => {
                    return Some(JsonRpcResponse::error(
                        req.id.clone(),
                        JsonRpcError::invalid_params("Missing params for tools/call"),
                    ));
                }
            };

            match call_tool(&params, ctx).await {
                Ok(tool_result) => match serde_json::to_value(&tool_result) {
                    Ok(value) => Some(JsonRpcResponse::success(req.id.clone(), value)),
                    Err(e) => Some(JsonRpcResponse::error(
                        req.id.clone(),
                        JsonRpcError::internal_error(format!("Cannot serialize tool result: {e}")),
                    )),
                },
                Err(err) => {
                    warn!(tool = %params.name, error = %err, "tool call failed");
                    Some(JsonRpcResponse::error(req.id.clone(), JsonRpcError::from(&err)))
                }
            }
        }

        _ => Some(JsonRpcResponse::error(
            req.id.clone(),
            JsonRpcError::method_not_found(&req.method),
        )),
    }
}

/// Run one tool invocation.
///
/// Always authenticates first, even for unknown tools and `list-realms`.
/// Invalid arguments produce an error-flagged [`ToolResult`]; an unknown
/// tool name or a Keycloak failure is returned as a [`DispatchError`].
pub async fn call_tool(
    params: &ToolCallParams,
    ctx: &ServerContext,
) -> Result<ToolResult, DispatchError> {
    let admin = ctx.admin.as_ref();
    let session = admin.authenticate(&ctx.credentials).await?;

    let tool = Tool::from_name(&params.name)
        .ok_or_else(|| DispatchError::UnknownTool(params.name.clone()))?;

    let request = match validation::validate(tool, params.arguments.as_ref()) {
        Ok(request) => request,
        Err(errors) => {
            debug!(tool = tool.name(), %errors, "rejected tool arguments");
            return Ok(ToolResult::error(errors.to_string()));
        }
    };

    debug!(tool = tool.name(), realm_scoped = tool.is_realm_scoped(), "invoking tool");
    let result = match request {
        ToolRequest::CreateUser(r) => create_user::handle(admin, &session, r).await?,
        ToolRequest::DeleteUser(r) => delete_user::handle(admin, &session, r).await?,
        ToolRequest::ListRealms => list_realms::handle(admin, &session).await?,
        ToolRequest::ListUsers(r) => list_users::handle(admin, &session, r).await?,
    };
    Ok(result)
}
