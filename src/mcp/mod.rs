//! Model Context Protocol (MCP) server.
//!
//! JSON-RPC 2.0 over stdio, one message per line. The server owns the
//! session lifecycle; the tools call straight into the package engine.
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    ┌──────────────────┐
//! │  transport  │───▶│  protocol   │───▶│   server    │───▶│      tools       │
//! │   (stdio)   │    │ (JSON-RPC)  │    │ (lifecycle) │    │ packages, export │
//! └─────────────┘    └─────────────┘    └─────────────┘    └──────────────────┘
//! ```
//!
//! Protocol version 2024-11-05.

pub mod protocol;
pub mod server;
pub mod tools;
pub mod transport;

pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION};
pub use server::{McpServer, Reply, ServerState};
pub use tools::{PackageTools, Tool, ToolCallResult};
pub use transport::StdioTransport;
