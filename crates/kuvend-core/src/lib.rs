//! Core types for the Kuvend orchestration layer.
//!
//! This crate provides the types shared by every Kuvend component:
//! - The fixed persona registry (PersonaKey, PersonaProfile)
//! - Reasoning cycle artifacts (PipelineResult and its stages)
//! - Request endpoints (Endpoint)
//! - The user-visible error taxonomy (KuvendError)

mod endpoint;
mod error;
mod persona;
mod pipeline;

pub use endpoint::Endpoint;
pub use error::{KuvendError, Result};
pub use persona::{ComplexityLevel, PersonaKey, PersonaProfile, PERSONA_REGISTRY};
pub use pipeline::{
    ClassifiedType, ContentType, Intake, Intent, Load, PipelineResult, ReasoningStep, StepKind,
    Tags,
};
