//! Line-oriented session over one process-lifetime cache.

use anyhow::Result;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use kuvend_core::{Endpoint, KuvendError, PersonaKey};

use crate::cli::commands::resolve::render_value;
use crate::config::KuvendConfig;
use crate::llms::generator_from_config;
use crate::orchestrator::{Orchestrator, ResolveRequest};

const HELP: &str = "\
<endpoint> [@persona ...] <prompt>   resolve a request (cycle, debate, combined, generate)
:stats                               cache statistics
:entries                             live cache entries
:clear                               drop every entry
:cleanup                             sweep expired entries
:ttl <ms>                            change the default TTL
:quit                                leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Resolve(ResolveRequest),
    Stats,
    Entries,
    Clear,
    Cleanup,
    Ttl(Duration),
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = KuvendError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if let Some(directive) = line.strip_prefix(':') {
            let mut parts = directive.split_whitespace();
            return match (parts.next(), parts.next()) {
                (Some("stats"), None) => Ok(Self::Stats),
                (Some("entries"), None) => Ok(Self::Entries),
                (Some("clear"), None) => Ok(Self::Clear),
                (Some("cleanup"), None) => Ok(Self::Cleanup),
                (Some("help"), None) => Ok(Self::Help),
                (Some("quit") | Some("q"), None) => Ok(Self::Quit),
                (Some("ttl"), Some(ms)) => ms
                    .parse::<u64>()
                    .map(|ms| Self::Ttl(Duration::from_millis(ms)))
                    .map_err(|_| KuvendError::invalid_input(format!("invalid TTL: {}", ms))),
                _ => Err(KuvendError::invalid_input(format!(
                    "unknown directive: {}",
                    line
                ))),
            };
        }

        let (endpoint, mut rest) = line
            .split_once(char::is_whitespace)
            .ok_or_else(|| KuvendError::invalid_input("expected <endpoint> <prompt>"))?;
        let endpoint: Endpoint = endpoint.parse()?;

        let mut personas = Vec::new();
        loop {
            rest = rest.trim_start();
            let Some(tagged) = rest.strip_prefix('@') else {
                break;
            };
            let (name, tail) = tagged.split_once(char::is_whitespace).unwrap_or((tagged, ""));
            personas.push(name.parse::<PersonaKey>()?);
            rest = tail;
        }

        Ok(Self::Resolve(
            ResolveRequest::new(endpoint, rest.trim()).with_personas(personas),
        ))
    }
}

pub async fn run_session_command(config: &KuvendConfig) -> Result<()> {
    let orchestrator = Orchestrator::from_config(config, generator_from_config(&config.provider));
    let sweeper = config
        .cache
        .to_cleanup_trigger()
        .spawn(Arc::clone(orchestrator.store()));

    println!(
        "kuvend v{} ({}), :help for commands",
        env!("CARGO_PKG_VERSION"),
        orchestrator.language().code()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<SessionCommand>() {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        match command {
            SessionCommand::Resolve(request) => match orchestrator.resolve(&request).await {
                Ok(resolution) => {
                    print!("{}", render_value(&resolution.value));
                    println!(
                        "[{}]",
                        if resolution.served_from_cache {
                            "cache"
                        } else {
                            "computed"
                        }
                    );
                }
                Err(e) => eprintln!("{}: {}", e.kind(), e),
            },
            SessionCommand::Stats => {
                println!("{}", serde_json::to_string_pretty(&orchestrator.stats())?)
            }
            SessionCommand::Entries => {
                println!("{}", serde_json::to_string_pretty(&orchestrator.list_entries())?)
            }
            SessionCommand::Clear => {
                orchestrator.clear();
                println!("cleared");
            }
            SessionCommand::Cleanup => println!("removed {}", orchestrator.cleanup()),
            SessionCommand::Ttl(ttl) => {
                if orchestrator.set_default_ttl(ttl) {
                    println!("default TTL set to {}ms", ttl.as_millis());
                } else {
                    eprintln!("TTL must be positive");
                }
            }
            SessionCommand::Help => println!("{}", HELP),
            SessionCommand::Quit => break,
        }
    }

    if let Some(handle) = sweeper {
        handle.abort();
    }
    orchestrator.shutdown();
    Ok(())
}
