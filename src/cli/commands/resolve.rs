use anyhow::Result;

use kuvend_core::{Endpoint, PersonaKey};

use crate::cli::commands::debate::render_perspectives;
use crate::config::KuvendConfig;
use crate::llms::generator_from_config;
use crate::orchestrator::{Orchestrator, ResolveRequest, Resolution, ResolvedValue};

pub async fn run_resolve_command(
    prompt: &str,
    endpoint: Endpoint,
    personas: &[PersonaKey],
    mode: Option<String>,
    json: bool,
    debug: bool,
    config: &KuvendConfig,
) -> Result<()> {
    let orchestrator = Orchestrator::from_config(config, generator_from_config(&config.provider));

    let mut request = ResolveRequest::new(endpoint, prompt).with_personas(personas.iter().copied());
    if let Some(mode) = mode {
        request = request.with_mode(mode);
    }

    let resolution = orchestrator.resolve(&request).await?;
    print_resolution(&resolution, json, debug)?;

    orchestrator.shutdown();
    Ok(())
}

pub fn print_resolution(resolution: &Resolution, json: bool, debug: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(resolution)?);
        return Ok(());
    }

    print!("{}", render_value(&resolution.value));
    let source = if resolution.served_from_cache {
        "cache"
    } else {
        "computed"
    };
    if debug {
        eprintln!("[{}] key={}", source, resolution.key);
    } else {
        eprintln!("[{}]", source);
    }

    Ok(())
}

pub fn render_value(value: &ResolvedValue) -> String {
    match value {
        ResolvedValue::Cycle(result) => format!("{}\n", result.final_text),
        ResolvedValue::Debate(perspectives) => render_perspectives(perspectives),
        ResolvedValue::Combined { cycle, debate } => {
            format!("{}\n\n{}", cycle.final_text, render_perspectives(debate))
        }
        ResolvedValue::Generated(text) => format!("{}\n", text),
    }
}
