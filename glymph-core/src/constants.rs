//! Application constants
//!
//! Single source of truth for paths, defaults and provider endpoints.

/// Default configuration file path
pub const CONFIG_PATH: &str = "config/glymph.toml";

/// Default environment file path
pub const ENV_PATH: &str = "config/.env";

/// Environment variable that overrides the configured database URL
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Environment variable holding the JWT signing secret
pub const DEFAULT_JWT_SECRET_ENV: &str = "GLYMPH_JWT_SECRET";

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/glymph.db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Message returned by an agent whose assembly failed
pub const DEFAULT_FALLBACK_MESSAGE: &str = "Sorry, something went wrong.";

/// Upper bound on tool calls an agent may make while answering one input
pub const DEFAULT_MAX_TOOL_STEPS: usize = 5;

pub const ACCESS_TOKEN_MINUTES: i64 = 15;
pub const REFRESH_TOKEN_DAYS: i64 = 7;
pub const ACTIVATION_TOKEN_HOURS: i64 = 24;
pub const PASSWORD_RESET_TOKEN_HOURS: i64 = 1;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 50;

/// Role that unlocks administrative endpoints
pub const ADMIN_ROLE: &str = "admin";

pub const OPENAI_ENDPOINT: &str = "https://api.openai.com";
pub const OPENAI_API_PATH: &str = "/v1/chat/completions";
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o";
pub const OPENAI_DEFAULT_TEMPERATURE: f32 = 0.7;

pub const COHERE_ENDPOINT: &str = "https://api.cohere.ai";
pub const COHERE_API_PATH: &str = "/v1/chat";
pub const COHERE_DEFAULT_MODEL: &str = "command-xlarge-nightly";

pub const HUGGINGFACE_ENDPOINT: &str = "https://api-inference.huggingface.co";
