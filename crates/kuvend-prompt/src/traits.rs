//! Persona rendering capability.

use kuvend_core::{PersonaKey, PersonaProfile};

/// A perspective generator for one registered persona.
///
/// Implementations must be pure functions of `prompt`: the debate engine
/// renders personas independently and relies on identical input producing
/// identical output.
pub trait Persona: Send + Sync {
    /// Registry key this renderer answers for.
    fn key(&self) -> PersonaKey;

    /// Render this persona's perspective on `prompt`.
    fn render(&self, prompt: &str) -> String;

    /// Static profile from the registry.
    fn profile(&self) -> &'static PersonaProfile {
        self.key().profile()
    }
}
