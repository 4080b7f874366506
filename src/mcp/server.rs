//! MCP session over stdio.
//!
//! A session moves through [`ServerState`] in one direction:
//!
//! ```text
//! AwaitingInit --initialize--> Initialising --notifications/initialized--> Running
//! ```
//!
//! Tool requests are refused until the session is running. End of input or a
//! termination signal ends the session.

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::mcp::protocol::{
    parse_message, IncomingMessage, JsonRpcError, JsonRpcNotification, JsonRpcRequest,
    JsonRpcResponse, MCP_PROTOCOL_VERSION, SERVER_NAME,
};
use crate::mcp::tools::{PackageTools, Tool};
use crate::mcp::transport::StdioTransport;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// No `initialize` yet.
    AwaitingInit,
    /// `initialize` answered, waiting for the client's confirmation.
    Initialising,
    /// Serving tool calls.
    Running,
    /// Input closed or a signal arrived.
    ShuttingDown,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitializeParams {
    protocol_version: String,
    #[serde(default)]
    client_info: Option<ClientInfo>,
}

#[derive(Debug, Deserialize)]
struct ClientInfo {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// Reply to one incoming line.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Response(JsonRpcResponse),
    Error(JsonRpcError),
}

impl From<Result<JsonRpcResponse, JsonRpcError>> for Reply {
    fn from(result: Result<JsonRpcResponse, JsonRpcError>) -> Self {
        match result {
            Ok(response) => Self::Response(response),
            Err(error) => Self::Error(error),
        }
    }
}

/// The MCP server.
pub struct McpServer {
    state: ServerState,
    transport: StdioTransport,
    /// Set once `initialize` has been answered.
    protocol_version: Option<String>,
    tools: PackageTools,
}

impl McpServer {
    /// Creates a server answering tool calls with `tools`.
    #[must_use]
    pub fn new(tools: PackageTools) -> Self {
        Self {
            state: ServerState::AwaitingInit,
            transport: StdioTransport::new(),
            protocol_version: None,
            tools,
        }
    }

    #[must_use]
    pub const fn state(&self) -> ServerState {
        self.state
    }

    #[must_use]
    pub fn protocol_version(&self) -> Option<&str> {
        self.protocol_version.as_deref()
    }

    /// Serves stdin until it closes or the process is asked to stop.
    ///
    /// # Errors
    ///
    /// Returns an error if stdio fails or signal handlers cannot be installed.
    pub async fn run(&mut self) -> io::Result<()> {
        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                signal = &mut shutdown => {
                    let signal = signal?;
                    tracing::info!(signal, "Shutting down");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                line = self.transport.read_line() => {
                    let Some(line) = line? else {
                        tracing::debug!("stdin closed");
                        self.state = ServerState::ShuttingDown;
                        return Ok(());
                    };

                    if let Some(reply) = self.handle_line(&line) {
                        self.transport.write_message(&reply).await?;
                    }
                }
            }
        }
    }

    /// Handles one transport line. Notifications and blank lines get no reply.
    pub fn handle_line(&mut self, line: &str) -> Option<Reply> {
        if line.trim().is_empty() {
            return None;
        }

        match parse_message(line) {
            Ok(IncomingMessage::Request(req)) => Some(self.handle_request(&req).into()),
            Ok(IncomingMessage::Notification(notif)) => {
                self.handle_notification(&notif);
                None
            }
            Err(error) => {
                tracing::debug!(code = error.error.code, "Rejected malformed message");
                Some(Reply::Error(error))
            }
        }
    }

    /// Answers a request.
    ///
    /// # Errors
    ///
    /// Returns the JSON-RPC error to send back to the client.
    pub fn handle_request(&mut self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        tracing::debug!(id = %req.id, method = %req.method, "Request");

        let result = match req.method.as_str() {
            "initialize" => self.initialize(req)?,
            "ping" => json!({}),
            "tools/list" => {
                self.require_running(req)?;
                let tools: Vec<Value> = Tool::ALL.into_iter().map(Tool::definition).collect();
                json!({ "tools": tools })
            }
            "tools/call" => {
                self.require_running(req)?;
                let params: ToolCallParams = req.decode_params("tool call")?.ok_or_else(|| {
                    JsonRpcError::invalid_params(req.id.clone(), "Missing tool call params")
                })?;
                let outcome = self.tools.call(&params.name, &params.arguments);
                serde_json::to_value(outcome).map_err(|e| {
                    tracing::error!(error = %e, "Failed to serialise tool result");
                    JsonRpcError::internal_error(req.id.clone(), "Failed to serialise result")
                })?
            }
            _ => return Err(JsonRpcError::method_not_found(req.id.clone(), &req.method)),
        };

        Ok(JsonRpcResponse::success(req.id.clone(), result))
    }

    /// Applies a notification. Unknown notifications are ignored.
    pub fn handle_notification(&mut self, notif: &JsonRpcNotification) {
        if notif.method == "notifications/initialized" && self.state == ServerState::Initialising {
            tracing::info!("Session running");
            self.state = ServerState::Running;
        }
    }

    fn initialize(&mut self, req: &JsonRpcRequest) -> Result<Value, JsonRpcError> {
        if self.state != ServerState::AwaitingInit {
            return Err(JsonRpcError::invalid_request(
                Some(req.id.clone()),
                "Server already initialised",
            ));
        }

        let params: InitializeParams = req.decode_params("initialize")?.ok_or_else(|| {
            JsonRpcError::invalid_params(req.id.clone(), "Missing initialize params")
        })?;

        tracing::info!(
            client = params.client_info.as_ref().map_or("unknown", |c| c.name.as_str()),
            requested = %params.protocol_version,
            negotiated = MCP_PROTOCOL_VERSION,
            "Initialising session"
        );

        self.protocol_version = Some(MCP_PROTOCOL_VERSION.to_string());
        self.state = ServerState::Initialising;

        Ok(json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": { "tools": {} },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION"),
            },
        }))
    }

    fn require_running(&self, req: &JsonRpcRequest) -> Result<(), JsonRpcError> {
        if self.state == ServerState::Running {
            Ok(())
        } else {
            Err(JsonRpcError::invalid_request(
                Some(req.id.clone()),
                "Server not initialised",
            ))
        }
    }
}

/// Resolves with the name of the first termination signal received.
#[cfg(unix)]
async fn shutdown_signal() -> io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = sigint.recv() => Ok("SIGINT"),
        _ = sigterm.recv() => Ok("SIGTERM"),
    }
}

/// Resolves with the name of the first termination signal received.
#[cfg(windows)]
async fn shutdown_signal() -> io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("Ctrl+C")
}
