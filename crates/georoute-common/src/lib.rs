//! Georoute Common Types and Transport
//!
//! This crate provides the control protocol definitions and HTTP transport
//! helpers shared by the georoute controller and CLI.
//!
//! # Overview
//!
//! Georoute routes clients, identified only by their source IP, to the
//! geographically nearest member of a fleet of content-serving edge nodes.
//! This crate contains the pieces every component agrees on:
//!
//! - **Protocol Layer**: JSON-RPC 2.0 message types, the typed control
//!   command schema, and the error taxonomy
//! - **Transport Layer**: helpers for moving JSON-RPC messages over HTTP
//!
//! # Example
//!
//! ```
//! use georoute_common::protocol::{ControlCommand, JsonRpcRequest};
//! use serde_json::json;
//!
//! let request = JsonRpcRequest {
//!     jsonrpc: "2.0".into(),
//!     method: "loadNodes".into(),
//!     params: json!(["1.1.1.1", "2.2.2.2"]),
//!     id: json!(1),
//! };
//!
//! let command = ControlCommand::parse(&request.method, &request.params).unwrap();
//! assert!(matches!(command, ControlCommand::LoadNodes(_)));
//! ```

pub mod protocol;
pub mod transport;

pub use protocol::*;
