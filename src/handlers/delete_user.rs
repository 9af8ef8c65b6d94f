use crate::admin::{AdminSession, KeycloakAdmin};
use crate::error::AdminResult;
use crate::protocol::ToolResult;
use crate::validation::DeleteUserRequest;

/// Handle a `delete-user` tool call.
pub async fn handle(
    admin: &dyn KeycloakAdmin,
    session: &AdminSession,
    request: DeleteUserRequest,
) -> AdminResult<ToolResult> {
    admin
        .delete_user(session.in_realm(&request.realm), &request.user_id)
        .await?;

    Ok(ToolResult::text(format!(
        "User {} deleted successfully from realm {}",
        request.user_id, request.realm
    )))
}
