use anyhow::Result;
use std::collections::BTreeMap;

use kuvend_core::PersonaKey;
use kuvend_prompt::DebateEngine;

use crate::config::KuvendConfig;

pub fn run_debate_command(prompt: &str, json: bool, config: &KuvendConfig) -> Result<()> {
    let perspectives = DebateEngine::new(config.pipeline.language()).debate(prompt)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&perspectives)?);
    } else {
        print!("{}", render_perspectives(&perspectives));
    }

    Ok(())
}

/// One block per persona, in registry order.
pub fn render_perspectives(perspectives: &BTreeMap<PersonaKey, String>) -> String {
    perspectives
        .iter()
        .map(|(key, text)| format!("[{}]\n{}\n\n", key, text))
        .collect()
}
