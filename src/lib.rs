pub mod cli;
pub mod config;
pub mod llms;
pub mod orchestrator;
pub mod singleflight;

// Re-export core types for convenience
pub use kuvend_core::{Endpoint, KuvendError, PersonaKey};
pub use orchestrator::{Orchestrator, Resolution, ResolveRequest, ResolvedValue};
