//! Integration tests for MCP protocol handling.
//!
//! These tests verify the MCP server's JSON-RPC 2.0 protocol implementation,
//! including request/response handling, error responses, and lifecycle management.

use std::path::PathBuf;

use package_model_mcp::mcp::protocol::{
    parse_message, ErrorCode, IncomingMessage, JsonRpcRequest, RequestId,
};
use package_model_mcp::mcp::{McpServer, PackageTools, ServerState};
use package_model_mcp::packages::{default_config, PackageKind};
use serde_json::{json, Value};

fn request(json: &str) -> JsonRpcRequest {
    match parse_message(json) {
        Ok(IncomingMessage::Request(req)) => req,
        other => panic!("Expected Request, got {other:?}"),
    }
}

fn initialised_server(allowed: PathBuf) -> McpServer {
    let mut server = McpServer::new(PackageTools::new(vec![allowed]));

    let init = request(
        r#"{
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": { "name": "test-client", "version": "1.0.0" }
            }
        }"#,
    );
    server.handle_request(&init).unwrap();

    let IncomingMessage::Notification(notif) =
        parse_message(r#"{"jsonrpc": "2.0", "method": "notifications/initialized"}"#).unwrap()
    else {
        panic!("Expected Notification");
    };
    server.handle_notification(&notif);

    server
}

fn call(server: &mut McpServer, id: i64, name: &str, arguments: &Value) -> Value {
    let req = request(
        &json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "tools/call",
            "params": { "name": name, "arguments": arguments }
        })
        .to_string(),
    );
    let resp = server.handle_request(&req).unwrap();
    assert_eq!(resp.id, RequestId::Number(id));
    resp.result
}

fn text_of(result: &Value) -> Value {
    serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap()
}

// =============================================================================
// Protocol Parsing Tests
// =============================================================================

#[test]
fn test_parse_tools_call_request() {
    let req = request(
        r#"{
            "jsonrpc": "2.0",
            "id": "abc",
            "method": "tools/call",
            "params": { "name": "package_name", "arguments": { "config": { "type": "qfn" } } }
        }"#,
    );

    assert_eq!(req.method, "tools/call");
    assert_eq!(req.id, RequestId::String("abc".to_string()));
}

#[test]
fn test_parse_invalid_json() {
    assert!(parse_message("not valid json").is_err());
}

#[test]
fn test_parse_missing_jsonrpc_version() {
    assert!(parse_message(r#"{"id": 1, "method": "test"}"#).is_err());
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_lifecycle_reaches_running() {
    let server = initialised_server(PathBuf::from("."));
    assert_eq!(server.state(), ServerState::Running);
    assert_eq!(server.protocol_version(), Some("2024-11-05"));
}

#[test]
fn test_initialize_twice_is_rejected() {
    let mut server = initialised_server(PathBuf::from("."));
    let init = request(
        r#"{"jsonrpc": "2.0", "id": 9, "method": "initialize",
            "params": {"protocolVersion": "2024-11-05"}}"#,
    );

    let err = server.handle_request(&init).unwrap_err();
    assert_eq!(err.error.code, ErrorCode::InvalidRequest.code());
}

#[test]
fn test_unknown_method() {
    let mut server = initialised_server(PathBuf::from("."));
    let req = request(r#"{"jsonrpc": "2.0", "id": 3, "method": "resources/list"}"#);

    let err = server.handle_request(&req).unwrap_err();
    assert_eq!(err.error.code, ErrorCode::MethodNotFound.code());
}

#[test]
fn test_tools_list() {
    let mut server = initialised_server(PathBuf::from("."));
    let req = request(r#"{"jsonrpc": "2.0", "id": 2, "method": "tools/list"}"#);

    let resp = server.handle_request(&req).unwrap();
    let names: Vec<&str> = resp.result["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();

    assert_eq!(
        names,
        [
            "list_package_kinds",
            "default_config",
            "generate_solids",
            "package_name",
            "export_freecad_script"
        ]
    );
}

// =============================================================================
// Tool Call Tests
// =============================================================================

#[test]
fn test_default_config_then_generate() {
    let mut server = initialised_server(PathBuf::from("."));

    let config = text_of(&call(&mut server, 4, "default_config", &json!({ "kind": "qfn" })));
    assert_eq!(config["type"], "qfn");

    let solids = text_of(&call(
        &mut server,
        5,
        "generate_solids",
        &json!({ "config": config }),
    ));
    assert_eq!(solids["solid_count"], 50);
    assert_eq!(solids["name"], "QFN-48-1EP_6x6mm_P0.4mm_EP4.6x4.6mm");
    assert_eq!(solids["solids"][0]["type"], "body");
    assert_eq!(solids["solids"][0]["size"], json!([6.0, 6.0, 0.85]));
}

#[test]
fn test_package_name_tool() {
    let mut server = initialised_server(PathBuf::from("."));
    let config = serde_json::to_value(default_config(PackageKind::Wson)).unwrap();

    let result = text_of(&call(&mut server, 6, "package_name", &json!({ "config": config })));
    assert_eq!(result["name"], "WSON-8-1EP_5x6mm_P1.27mm_EP3.4x4mm");
}

#[test]
fn test_invalid_config_is_tool_error() {
    let mut server = initialised_server(PathBuf::from("."));
    let mut config = serde_json::to_value(default_config(PackageKind::Qfn)).unwrap();
    config["body"]["height"] = json!(0.0);

    let result = call(&mut server, 7, "package_name", &json!({ "config": config }));
    assert_eq!(result["isError"], true);
    assert!(result["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("body.height"));
}

#[test]
fn test_oversized_pad_count_is_tool_error() {
    let mut server = initialised_server(PathBuf::from("."));
    let mut config = serde_json::to_value(default_config(PackageKind::Wson)).unwrap();
    config["pad_count_per_side"] = json!(u32::MAX);

    for (id, tool) in [(11, "package_name"), (12, "generate_solids")] {
        let result = call(&mut server, id, tool, &json!({ "config": config }));
        assert_eq!(result["isError"], true, "{tool}");
        assert!(result["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("pad_count_per_side"));
    }
}

#[test]
fn test_unknown_tool_is_tool_error() {
    let mut server = initialised_server(PathBuf::from("."));
    let result = call(&mut server, 8, "render_step", &json!({}));
    assert_eq!(result["isError"], true);
}

#[test]
fn test_export_writes_inside_allowed_path() {
    let dir = tempfile::tempdir().unwrap();
    let mut server = initialised_server(dir.path().to_path_buf());
    let config = serde_json::to_value(default_config(PackageKind::Wson)).unwrap();
    let target = dir.path().join("wson.py");

    let result = text_of(&call(
        &mut server,
        10,
        "export_freecad_script",
        &json!({ "config": config, "filepath": target.to_string_lossy() }),
    ));

    let written = std::fs::read_to_string(&target).unwrap();
    assert_eq!(result["script"].as_str().unwrap(), written);
    assert!(written.starts_with("# Auto-generated FreeCAD script"));
}
