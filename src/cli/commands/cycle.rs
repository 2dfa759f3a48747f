use anyhow::Result;

use kuvend_prompt::ReasoningCycle;

use crate::config::KuvendConfig;

pub fn run_cycle_command(prompt: &str, json: bool, config: &KuvendConfig) -> Result<()> {
    let result = ReasoningCycle::new(config.pipeline.language()).run(prompt)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.final_text);
    }

    Ok(())
}
