//! Cache key derivation

use kuvend_core::{Endpoint, PersonaKey};

/// Current key format version - increment when templates change
pub const KEY_VERSION: &str = "v1";

/// Default number of prompt characters kept in a key
pub const DEFAULT_PROMPT_PREFIX_CHARS: usize = 50;

/// Mode rendered into the key when the request has none
pub const DEFAULT_MODE: &str = "default";

/// Canonicalizes a logical request into one cache key.
///
/// Only the first `prefix_chars` characters of the prompt take part in the
/// key, so prompts sharing that prefix share a cached answer. This is fine
/// for the deterministic pipeline, which only reads coarse prompt features,
/// but it is a correctness hazard for caching free-form generation with the
/// same deriver.
#[derive(Debug, Clone)]
pub struct KeyDeriver {
    version: String,
    prefix_chars: usize,
}

impl KeyDeriver {
    /// Create a deriver keeping `prefix_chars` characters of the prompt
    pub fn new(prefix_chars: usize) -> Self {
        Self {
            version: KEY_VERSION.to_string(),
            prefix_chars: prefix_chars.max(1),
        }
    }

    /// Create a deriver with a custom version tag
    pub fn with_version(version: String, prefix_chars: usize) -> Self {
        Self {
            version,
            prefix_chars: prefix_chars.max(1),
        }
    }

    /// Derive the key for `(endpoint, personas, prompt, mode)`.
    ///
    /// Layout: `{version}|{endpoint}|{sorted,personas}|{len}:{mode}|{prompt prefix}`.
    /// The mode is caller-supplied free text, so it carries its byte length
    /// and a `|` inside it cannot shift the prompt boundary. Persona order
    /// and duplicates in the request never change the key.
    pub fn derive(
        &self,
        endpoint: Endpoint,
        personas: &[PersonaKey],
        prompt: &str,
        mode: Option<&str>,
    ) -> String {
        let mut ids: Vec<&str> = personas.iter().map(|p| p.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();

        let mode = mode.filter(|m| !m.is_empty()).unwrap_or(DEFAULT_MODE);
        let prefix: String = prompt.chars().take(self.prefix_chars).collect();

        format!(
            "{}|{}|{}|{}:{}|{}",
            self.version,
            endpoint.as_str(),
            ids.join(","),
            mode.len(),
            mode,
            prefix
        )
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn prefix_chars(&self) -> usize {
        self.prefix_chars
    }
}

impl Default for KeyDeriver {
    fn default() -> Self {
        Self::new(DEFAULT_PROMPT_PREFIX_CHARS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_deterministic() {
        let deriver = KeyDeriver::default();

        let key1 = deriver.derive(Endpoint::Cycle, &[], "test prompt", None);
        let key2 = deriver.derive(Endpoint::Cycle, &[], "test prompt", None);

        assert_eq!(key1, key2, "Same inputs should produce same key");
    }

    #[test]
    fn test_persona_order_independent() {
        let deriver = KeyDeriver::default();

        let key1 = deriver.derive(Endpoint::Debate, &[PersonaKey::Albi, PersonaKey::Alba], "X", None);
        let key2 = deriver.derive(Endpoint::Debate, &[PersonaKey::Alba, PersonaKey::Albi], "X", None);

        assert_eq!(key1, key2);
    }

    #[test]
    fn test_duplicate_personas_collapse() {
        let deriver = KeyDeriver::default();

        let key1 = deriver.derive(Endpoint::Debate, &[PersonaKey::Jona, PersonaKey::Jona], "X", None);
        let key2 = deriver.derive(Endpoint::Debate, &[PersonaKey::Jona], "X", None);

        assert_eq!(key1, key2);
    }

    #[test]
    fn test_personas_sorted_lexicographically() {
        let deriver = KeyDeriver::default();
        let key = deriver.derive(
            Endpoint::Generate,
            &[PersonaKey::Jona, PersonaKey::Asi, PersonaKey::Blerina],
            "X",
            None,
        );

        assert_eq!(key, "v1|generate|asi,blerina,jona|7:default|X");
    }

    #[test]
    fn test_prompt_truncated_to_prefix() {
        let deriver = KeyDeriver::default();
        let shared = "a".repeat(50);

        let key1 = deriver.derive(Endpoint::Cycle, &[], &format!("{}first", shared), None);
        let key2 = deriver.derive(Endpoint::Cycle, &[], &format!("{}second", shared), None);

        assert_eq!(key1, key2, "Prompts sharing the prefix collide by design");
    }

    #[test]
    fn test_truncation_counts_characters() {
        let deriver = KeyDeriver::new(3);
        let key = deriver.derive(Endpoint::Cycle, &[], "ëëëë", None);

        assert!(key.ends_with("|ëëë"));
    }

    #[test]
    fn test_different_endpoints_and_modes() {
        let deriver = KeyDeriver::default();

        let cycle = deriver.derive(Endpoint::Cycle, &[], "X", None);
        let debate = deriver.derive(Endpoint::Debate, &[], "X", None);
        let fast = deriver.derive(Endpoint::Cycle, &[], "X", Some("fast"));
        let empty_mode = deriver.derive(Endpoint::Cycle, &[], "X", Some(""));

        assert_ne!(cycle, debate);
        assert_ne!(cycle, fast);
        assert_eq!(cycle, empty_mode);
    }

    #[test]
    fn test_separator_in_mode_cannot_shift_prompt() {
        let deriver = KeyDeriver::default();

        let a = deriver.derive(Endpoint::Cycle, &[], "z", Some("x|y"));
        let b = deriver.derive(Endpoint::Cycle, &[], "y|z", Some("x"));

        assert_ne!(a, b);
        assert_eq!(a, "v1|cycle||3:x|y|z");
        assert_eq!(b, "v1|cycle||1:x|y|z");
    }

    #[test]
    fn test_different_versions() {
        let d1 = KeyDeriver::with_version("v1".to_string(), 50);
        let d2 = KeyDeriver::with_version("v2".to_string(), 50);

        assert_ne!(
            d1.derive(Endpoint::Cycle, &[], "X", None),
            d2.derive(Endpoint::Cycle, &[], "X", None)
        );
    }
}
