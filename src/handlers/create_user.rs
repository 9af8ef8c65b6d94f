use crate::admin::{AdminSession, KeycloakAdmin, NewUser};
use crate::error::AdminResult;
use crate::protocol::ToolResult;
use crate::validation::CreateUserRequest;

/// Handle a `create-user` tool call. New users are created enabled.
pub async fn handle(
    admin: &dyn KeycloakAdmin,
    session: &AdminSession,
    request: CreateUserRequest,
) -> AdminResult<ToolResult> {
    let user = NewUser {
        username: request.username,
        email: request.email,
        first_name: request.first_name,
        last_name: request.last_name,
        enabled: true,
    };

    let id = admin.create_user(session.in_realm(&request.realm), &user).await?;
    Ok(ToolResult::text(format!("User created successfully. User ID: {id}")))
}
