mod cli;

use clap::Parser;
use cli::{Cli, RunMode};
use glymph_core::agent::{AgentRegistry, AgentService};
use glymph_core::config::AppConfig;
use glymph_core::model::HttpClientFactory;
use glymph_core::server::{self, ServerState};
use glymph_core::store::Store;
use std::error::Error;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let cli = Cli::parse();
    debug!(?cli.mode, config = ?cli.config, "CLI arguments parsed");

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(addr) = cli.addr {
        config.server.bind = addr;
    }

    match cli.mode {
        RunMode::Serve => {
            let state = Arc::new(ServerState::from_config(&config).await?);
            info!(addr = %config.server.bind, "Starting REST server");
            server::serve(state, config.server.bind).await?;
        }
        RunMode::Migrate => {
            Store::connect(&config.database).await?;
            info!(url = %config.database.url, "Schema is up to date");
        }
        RunMode::Invoke => invoke(&cli, &config).await?,
    }
    Ok(())
}

/// One registry per run: the agent is assembled once and reused for every
/// input line.
async fn invoke(cli: &Cli, config: &AppConfig) -> Result<(), Box<dyn Error>> {
    let Some(name) = cli.agent.as_deref() else {
        warn!("Invoke mode needs --agent");
        return Err("--agent is required in invoke mode".into());
    };

    let store = Store::connect(&config.database).await?;
    let http = reqwest::Client::new();
    let factory = Arc::new(HttpClientFactory::new(http.clone()));
    let agents = AgentService::new(store, factory, http, config.agent.clone());
    let mut registry = AgentRegistry::new();

    if !cli.input.is_empty() {
        let input = cli.input.join(" ");
        let reply = agents.invoke_in(&mut registry, name, input.trim()).await?;
        println!("{}", reply.response);
        return Ok(());
    }

    info!(agent = %name, "Reading inputs from standard input");
    let stdin = BufReader::new(tokio::io::stdin());
    answer_lines(&agents, &mut registry, name, stdin, &mut tokio::io::stdout()).await?;
    Ok(())
}

/// Answer every non-blank line of `reader`, writing replies to `out` and
/// failures to stderr. Returns how many lines were answered.
async fn answer_lines<R, W>(
    agents: &AgentService,
    registry: &mut AgentRegistry,
    name: &str,
    reader: R,
    out: &mut W,
) -> Result<usize, Box<dyn Error>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut answered = 0;
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        match agents.invoke_in(registry, name, input).await {
            Ok(reply) => {
                out.write_all(format!("{}\n", reply.response).as_bytes()).await?;
                out.flush().await?;
                answered += 1;
            }
            Err(err) => eprintln!("error: {}", err.user_message()),
        }
    }
    Ok(answered)
}

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(true)
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use glymph_core::config::AgentSettings;
    use glymph_core::domain::{AgentConfigInput, LlmParams};

    #[tokio::test]
    async fn every_non_blank_line_gets_a_reply() {
        let store = Store::in_memory().await.unwrap();
        let http = reqwest::Client::new();
        let factory = Arc::new(HttpClientFactory::new(http.clone()));
        let agents = AgentService::new(store, factory, http, AgentSettings::default());
        agents
            .create(AgentConfigInput {
                name: "Bot".to_string(),
                llm_type: "offline-llm".to_string(),
                llm_config: LlmParams {
                    api_key: Some("k".to_string()),
                    ..LlmParams::default()
                },
                prompt_template: "You are helpful.".to_string(),
                fallback_prompt: Some("We are offline.".to_string()),
                ..AgentConfigInput::default()
            })
            .await
            .unwrap();
        let mut registry = AgentRegistry::new();
        let mut out = Vec::new();

        let answered = answer_lines(&agents, &mut registry, "Bot", &b"hi\n\n  \nthere\n"[..], &mut out)
            .await
            .unwrap();

        assert_eq!(answered, 2);
        assert_eq!(String::from_utf8(out).unwrap(), "We are offline.\nWe are offline.\n");
        assert_eq!(registry.len(), 1);
    }
}
