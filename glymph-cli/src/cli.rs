use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "glymph",
    version,
    about = "Stores agent configurations and runs them on demand"
)]
pub struct Cli {
    /// Configuration file (defaults to config/glymph.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Overrides [server].bind
    #[arg(long)]
    pub addr: Option<SocketAddr>,
    #[arg(long, value_enum, default_value_t = RunMode::Serve)]
    pub mode: RunMode,
    /// Agent to run in invoke mode
    #[arg(long)]
    pub agent: Option<String>,
    /// Input for invoke mode; stdin is read line by line when omitted
    #[arg()]
    pub input: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// Run the REST server
    Serve,
    /// Create the database schema and exit
    Migrate,
    /// Answer input with a stored agent
    Invoke,
}
