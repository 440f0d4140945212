pub mod agent;
pub mod identity;
pub mod tool;
pub mod types;
pub mod webhook;

pub use agent::{AgentConfig, AgentConfigInput, AgentUpdate, LlmParams};
pub use identity::{
    NewUser, Organization, OrganizationInput, OrganizationUpdate, Permission, Role, User,
    UserUpdate,
};
pub use tool::{
    HttpMethod, InputLocation, ToolConfig, ToolConfigInput, ToolInvocation, ToolUpdate,
};
pub use webhook::{WebhookConfig, WebhookInput, WebhookUpdate};
