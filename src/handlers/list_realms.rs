use crate::admin::{AdminSession, KeycloakAdmin};
use crate::error::AdminResult;
use crate::protocol::ToolResult;

/// Handle a `list-realms` tool call.
///
/// Realms are listed in the order Keycloak returns them, one `- name` line each.
pub async fn handle(admin: &dyn KeycloakAdmin, session: &AdminSession) -> AdminResult<ToolResult> {
    let realms = admin.list_realms(session).await?;

    let lines: Vec<String> = realms.iter().map(|r| format!("- {}", r.realm)).collect();
    Ok(ToolResult::text(format!("Available realms:\n{}", lines.join("\n"))))
}
