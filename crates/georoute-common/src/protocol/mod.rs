pub mod command;
pub mod error;
pub mod jsonrpc;

pub use command::{ControlCommand, LoadNodesReply, StatusReply};
pub use error::{GeorouteError, Result};
pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
