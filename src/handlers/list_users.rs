use crate::admin::{AdminSession, KeycloakAdmin};
use crate::error::AdminResult;
use crate::protocol::ToolResult;
use crate::validation::ListUsersRequest;

/// Handle a `list-users` tool call.
pub async fn handle(
    admin: &dyn KeycloakAdmin,
    session: &AdminSession,
    request: ListUsersRequest,
) -> AdminResult<ToolResult> {
    let users = admin.list_users(session.in_realm(&request.realm)).await?;

    let lines: Vec<String> = users
        .iter()
        .map(|u| format!("- {} ({})", u.username, u.id))
        .collect();
    Ok(ToolResult::text(format!(
        "Users in realm {}:\n{}",
        request.realm,
        lines.join("\n")
    )))
}
