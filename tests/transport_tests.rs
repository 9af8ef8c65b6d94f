//! End-to-end tests of the newline-delimited JSON-RPC loop.

mod mocks;

use std::sync::Arc;

use mcp_keycloak_server::handlers::ServerContext;
use mcp_keycloak_server::server::McpServer;
use serde_json::Value;

use mocks::{admin_credentials, Call, MockKeycloakAdmin};

const INITIALIZE: &str =
    r#"{"jsonrpc":"2.0","id":0,"method":"initialize","params":{"protocolVersion":"2024-11-05"}}"#;
const INITIALIZED: &str = r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#;

async fn run_session(mock: &Arc<MockKeycloakAdmin>, lines: &[&str]) -> Vec<Value> {
    let input = lines.iter().map(|l| format!("{l}\n")).collect::<String>();
    let mut output = Vec::new();

    let mut server = McpServer::new(ServerContext::new(admin_credentials(), mock.clone()));
    server.serve(input.as_bytes(), &mut output).await.unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn full_session_lists_and_calls_tools() {
    let mock = Arc::new(MockKeycloakAdmin::seeded());
    let responses = run_session(
        &mock,
        &[
            INITIALIZE,
            INITIALIZED,
            r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#,
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"list-users","arguments":{"realm":"acme"}}}"#,
        ],
    )
    .await;

    assert_eq!(responses.len(), 3, "notification must not be answered");
    assert_eq!(responses[0]["id"], 0);
    assert_eq!(responses[1]["id"], 1);
    assert_eq!(responses[1]["result"]["tools"].as_array().unwrap().len(), 4);
    assert_eq!(responses[2]["id"], 2);
    assert_eq!(
        responses[2]["result"]["content"][0]["text"],
        "Users in realm acme:\n- alice (u-1)\n- bob (u-2)"
    );
}

#[tokio::test]
async fn requests_before_initialize_are_rejected() {
    let mock = Arc::new(MockKeycloakAdmin::seeded());
    let responses = run_session(
        &mock,
        &[
            r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"list-realms"}}"#,
            INITIALIZED,
        ],
    )
    .await;

    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["error"]["code"], -32600);
    assert_eq!(responses[0]["error"]["message"], "Server not initialized");
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn malformed_lines_get_parse_errors_and_loop_continues() {
    let mock = Arc::new(MockKeycloakAdmin::seeded());
    let responses = run_session(
        &mock,
        &[
            INITIALIZE,
            "{not json",
            "",
            r#"{"jsonrpc":"1.0","id":5,"method":"ping"}"#,
            r#"{"jsonrpc":"2.0","id":6,"method":"ping"}"#,
        ],
    )
    .await;

    assert_eq!(responses.len(), 4, "blank line is skipped");
    assert_eq!(responses[1]["error"]["code"], -32700);
    assert!(responses[1].get("id").is_none());
    assert_eq!(responses[2]["error"]["code"], -32600);
    assert_eq!(responses[2]["id"], 5);
    assert_eq!(responses[3]["id"], 6);
    assert!(responses[3]["result"].is_object());
}

#[tokio::test]
async fn each_tool_call_authenticates_in_order() {
    let mock = Arc::new(MockKeycloakAdmin::seeded());
    run_session(
        &mock,
        &[
            INITIALIZE,
            r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"list-realms"}}"#,
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"delete-user","arguments":{"realm":"acme","userId":"u-2"}}}"#,
        ],
    )
    .await;

    let calls = mock.calls();
    assert_eq!(calls.len(), 4);
    assert!(matches!(calls[0], Call::Authenticate { .. }));
    assert_eq!(calls[1], Call::ListRealms);
    assert!(matches!(calls[2], Call::Authenticate { .. }));
    assert_eq!(
        calls[3],
        Call::DeleteUser {
            realm: "acme".into(),
            user_id: "u-2".into()
        }
    );
}

#[tokio::test]
async fn unknown_tool_over_the_wire_is_error_response() {
    let mock = Arc::new(MockKeycloakAdmin::seeded());
    let responses = run_session(
        &mock,
        &[
            INITIALIZE,
            r#"{"jsonrpc":"2.0","id":"abc","method":"tools/call","params":{"name":"reset-password","arguments":{}}}"#,
        ],
    )
    .await;

    assert_eq!(responses[1]["id"], "abc");
    assert!(responses[1].get("result").is_none());
    assert_eq!(responses[1]["error"]["message"], "Unknown tool: reset-password");
}
