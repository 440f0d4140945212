//! Tooling module
//!
//! Turns stored tool descriptors into capabilities an agent can call.
//!
//! # Structure
//! - `error` - Call-time failures
//! - `request` - Pure mapping from descriptor + input to an HTTP request
//! - `http` - The `Tool` capability and its HTTP implementation
//! - `resolver` - Active-only resolution into a `ToolSet`

mod error;
mod http;
mod request;
mod resolver;

pub use error::ToolInvocationError;
pub use http::{HttpTool, Tool};
pub use request::{ToolRequest, build_request};
pub use resolver::{ToolSet, resolve_tools};
