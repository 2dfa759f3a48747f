use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::collections::HashMap;

use crate::cli::args::{validate_args, Args, Commands};
use crate::cli::commands::{
    run_cycle_command, run_debate_command, run_personas_command, run_resolve_command,
    run_session_command,
};
use crate::config::KuvendConfig;

pub struct RootCommand;

impl RootCommand {
    pub async fn execute() -> Result<()> {
        let args = Args::parse();

        if args.generate_config {
            println!("{}", KuvendConfig::generate_default_config());
            return Ok(());
        }

        validate_args(&args)?;

        let env_vars: HashMap<String, String> = std::env::vars().collect();
        let config = KuvendConfig::load_with_precedence(args.config.clone(), &args, &env_vars)?;
        if args.debug {
            eprintln!("{:#?}", config);
        }

        match &args.command {
            Some(Commands::Cycle { prompt, json }) => run_cycle_command(prompt, *json, &config),
            Some(Commands::Debate { prompt, json }) => run_debate_command(prompt, *json, &config),
            Some(Commands::Personas) => run_personas_command(),
            Some(Commands::Resolve {
                prompt,
                endpoint,
                personas,
                mode,
                json,
            }) => {
                run_resolve_command(
                    prompt,
                    *endpoint,
                    personas,
                    mode.clone(),
                    *json,
                    args.debug,
                    &config,
                )
                .await
            }
            Some(Commands::Session) => run_session_command(&config).await,
            None => {
                Args::command().print_help()?;
                println!();
                Ok(())
            }
        }
    }
}
