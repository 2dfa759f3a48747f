//! Fixed-panel persona debate.

use std::collections::BTreeMap;

use kuvend_core::{KuvendError, PersonaKey, Result};
use kuvend_i18n::Language;

use crate::templates::render_persona;
use crate::traits::Persona;

/// Persona backed by the built-in template for its key.
#[derive(Debug, Clone, Copy)]
pub struct TemplatePersona {
    key: PersonaKey,
    language: Language,
}

impl TemplatePersona {
    pub fn new(key: PersonaKey, language: Language) -> Self {
        Self { key, language }
    }
}

impl Persona for TemplatePersona {
    fn key(&self) -> PersonaKey {
        self.key
    }

    fn render(&self, prompt: &str) -> String {
        render_persona(self.key, self.language, prompt)
    }
}

/// The five-member panel, held in registry order.
pub struct DebateEngine {
    language: Language,
    personas: Vec<Box<dyn Persona>>,
}

impl DebateEngine {
    pub fn new(language: Language) -> Self {
        let personas = PersonaKey::ALL
            .iter()
            .map(|key| Box::new(TemplatePersona::new(*key, language)) as Box<dyn Persona>)
            .collect();

        Self { language, personas }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Render every persona on `prompt`. The result always holds all five keys.
    pub fn debate(&self, prompt: &str) -> Result<BTreeMap<PersonaKey, String>> {
        self.debate_subset(prompt, &PersonaKey::ALL)
    }

    /// Render only the personas in `keys`, still in registry order.
    ///
    /// An empty `keys` slice selects the full panel.
    pub fn debate_subset(
        &self,
        prompt: &str,
        keys: &[PersonaKey],
    ) -> Result<BTreeMap<PersonaKey, String>> {
        if prompt.trim().is_empty() {
            return Err(KuvendError::invalid_input("prompt must not be empty"));
        }

        let perspectives = self
            .select(keys)
            .map(|persona| (persona.key(), persona.render(prompt)))
            .collect();

        Ok(perspectives)
    }

    fn select<'a>(&'a self, keys: &'a [PersonaKey]) -> impl Iterator<Item = &'a dyn Persona> + 'a {
        self.personas
            .iter()
            .map(|persona| persona.as_ref())
            .filter(move |persona| keys.is_empty() || keys.contains(&persona.key()))
    }
}

impl Default for DebateEngine {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

impl std::fmt::Debug for DebateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebateEngine")
            .field("language", &self.language)
            .field("personas", &self.personas.len())
            .finish()
    }
}

/// Run the full panel with the default (Albanian) locale.
pub fn debate(prompt: &str) -> Result<BTreeMap<PersonaKey, String>> {
    DebateEngine::default().debate(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debate_returns_all_five() {
        let result = debate("test").unwrap();

        let keys: Vec<_> = result.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["alba", "albi", "jona", "blerina", "asi"]);
        for (key, text) in &result {
            assert!(!text.is_empty(), "{key} rendered nothing");
            assert!(text.contains("test"), "{key} dropped the prompt");
        }
    }

    #[test]
    fn test_debate_is_deterministic() {
        let engine = DebateEngine::new(Language::English);
        assert_eq!(
            engine.debate("a question").unwrap(),
            engine.debate("a question").unwrap()
        );
    }

    #[test]
    fn test_subset_keeps_registry_order() {
        let engine = DebateEngine::default();
        let result = engine
            .debate_subset("x", &[PersonaKey::Asi, PersonaKey::Alba])
            .unwrap();

        let keys: Vec<_> = result.keys().copied().collect();
        assert_eq!(keys, vec![PersonaKey::Alba, PersonaKey::Asi]);
    }

    #[test]
    fn test_empty_subset_means_full_panel() {
        let engine = DebateEngine::default();
        assert_eq!(engine.debate_subset("x", &[]).unwrap().len(), 5);
    }

    #[test]
    fn test_empty_prompt_rejected() {
        assert!(matches!(debate(" "), Err(KuvendError::InvalidInput(_))));
    }

    #[test]
    fn test_template_persona_profile() {
        let persona = TemplatePersona::new(PersonaKey::Blerina, Language::English);
        assert_eq!(persona.profile().name, "Blerina");
        assert!(persona.render("hi").starts_with("Blerina"));
    }
}
