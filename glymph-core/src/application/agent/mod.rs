//! Agent assembly and invocation.
//!
//! A stored [`AgentConfig`](crate::domain::AgentConfig) is turned into a
//! runnable agent per request: validated, bound to its active tools, given an
//! LLM client and a rendered prompt. Assembly never fails outward; a broken
//! configuration yields a fallback agent that answers with a fixed message.

mod assembler;
mod directive;
mod errors;
mod prompt;
mod registry;
mod runtime;
mod service;

#[cfg(test)]
mod tests;

pub use assembler::{AgentAssembler, Assembly};
pub use directive::{AgentDirective, parse_directive};
pub use errors::{AgentError, AssemblyError, PromptError};
pub use prompt::StructuredPrompt;
pub use registry::AgentRegistry;
pub use runtime::{FallbackAgent, RuntimeAgent, ToolCallingAgent};
pub use service::{AgentReply, AgentService};
