use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use kuvend_core::{Endpoint, PersonaKey};
use kuvend_i18n::Language;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = None
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Template locale: "sq" (default) or "en"
    #[arg(long, global = true)]
    pub language: Option<String>,

    /// Default cache TTL in milliseconds
    #[arg(long, global = true)]
    pub ttl_ms: Option<u64>,

    /// Bypass the cache entirely
    #[arg(long, global = true)]
    pub no_cache: bool,

    #[arg(long, global = true)]
    pub debug: bool,

    #[arg(long)]
    pub generate_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the four-stage reasoning cycle on a prompt
    Cycle {
        prompt: String,

        /// Print the full pipeline result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render every persona's perspective on a prompt
    Debate {
        prompt: String,

        #[arg(long)]
        json: bool,
    },

    /// List the persona registry
    Personas,

    /// Resolve one request through the cache
    Resolve {
        prompt: String,

        #[arg(short, long, default_value = "cycle")]
        endpoint: Endpoint,

        /// Persona to include (repeatable)
        #[arg(short, long = "persona")]
        personas: Vec<PersonaKey>,

        #[arg(short, long)]
        mode: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Interactive session sharing one cache across requests
    Session,
}

pub fn validate_args(args: &Args) -> Result<()> {
    if let Some(language) = &args.language {
        if Language::parse(language).is_none() {
            return Err(anyhow!("Unsupported language: {}", language));
        }
    }

    if args.ttl_ms == Some(0) {
        return Err(anyhow!("--ttl-ms must be positive"));
    }

    if let Some(Commands::Resolve {
        endpoint: Endpoint::Generate,
        personas,
        ..
    }) = &args.command
    {
        if personas.is_empty() {
            return Err(anyhow!("--endpoint generate needs at least one --persona"));
        }
    }

    Ok(())
}
