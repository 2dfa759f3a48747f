use anyhow::Result;

use kuvend_core::PERSONA_REGISTRY;

pub fn run_personas_command() -> Result<()> {
    println!("{:<8} {:<8} {:<12} {:<13} EXPERTISE", "KEY", "NAME", "TONE", "COMPLEXITY");
    for profile in PERSONA_REGISTRY.iter() {
        println!(
            "{:<8} {:<8} {:<12} {:<13} {}",
            profile.key.as_str(),
            profile.name,
            profile.tone,
            profile.complexity_level.as_str(),
            profile.expertise_tags.join(", ")
        );
    }
    Ok(())
}
