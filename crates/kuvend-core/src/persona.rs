//! The fixed persona registry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KuvendError;

/// Identifier of one of the five registered personas.
///
/// Variant order is registry order; `Ord` follows it, so ordered maps keyed
/// by `PersonaKey` iterate in registry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaKey {
    Alba,
    Albi,
    Jona,
    Blerina,
    Asi,
}

impl PersonaKey {
    /// All keys in registry order.
    pub const ALL: [PersonaKey; 5] = [
        PersonaKey::Alba,
        PersonaKey::Albi,
        PersonaKey::Jona,
        PersonaKey::Blerina,
        PersonaKey::Asi,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonaKey::Alba => "alba",
            PersonaKey::Albi => "albi",
            PersonaKey::Jona => "jona",
            PersonaKey::Blerina => "blerina",
            PersonaKey::Asi => "asi",
        }
    }

    /// Static profile of this persona.
    #[must_use]
    pub fn profile(&self) -> &'static PersonaProfile {
        // PERSONA_REGISTRY is laid out in variant order.
        &PERSONA_REGISTRY[*self as usize]
    }
}

impl fmt::Display for PersonaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PersonaKey {
    type Err = KuvendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "alba" => Ok(PersonaKey::Alba),
            "albi" => Ok(PersonaKey::Albi),
            "jona" => Ok(PersonaKey::Jona),
            "blerina" => Ok(PersonaKey::Blerina),
            "asi" => Ok(PersonaKey::Asi),
            other => Err(KuvendError::invalid_input(format!(
                "unknown persona '{}' (expected one of: alba, albi, jona, blerina, asi)",
                other
            ))),
        }
    }
}

/// How deep a persona's explanations go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ComplexityLevel {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexityLevel::Beginner => "beginner",
            ComplexityLevel::Intermediate => "intermediate",
            ComplexityLevel::Advanced => "advanced",
        }
    }
}

/// Declared identity of a persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonaProfile {
    pub key: PersonaKey,
    pub name: &'static str,
    pub expertise_tags: &'static [&'static str],
    pub tone: &'static str,
    pub complexity_level: ComplexityLevel,
}

/// The closed persona registry, in registry order.
pub static PERSONA_REGISTRY: [PersonaProfile; 5] = [
    PersonaProfile {
        key: PersonaKey::Alba,
        name: "Alba",
        expertise_tags: &["science", "research", "data"],
        tone: "analytical",
        complexity_level: ComplexityLevel::Advanced,
    },
    PersonaProfile {
        key: PersonaKey::Albi,
        name: "Albi",
        expertise_tags: &["technology", "engineering", "innovation"],
        tone: "pragmatic",
        complexity_level: ComplexityLevel::Intermediate,
    },
    PersonaProfile {
        key: PersonaKey::Jona,
        name: "Jona",
        expertise_tags: &["society", "ethics", "community"],
        tone: "empathetic",
        complexity_level: ComplexityLevel::Intermediate,
    },
    PersonaProfile {
        key: PersonaKey::Blerina,
        name: "Blerina",
        expertise_tags: &["education", "learning", "communication"],
        tone: "encouraging",
        complexity_level: ComplexityLevel::Beginner,
    },
    PersonaProfile {
        key: PersonaKey::Asi,
        name: "ASI",
        expertise_tags: &["synthesis", "strategy", "systems"],
        tone: "visionary",
        complexity_level: ComplexityLevel::Advanced,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_matches_keys() {
        for (index, key) in PersonaKey::ALL.iter().enumerate() {
            assert_eq!(PERSONA_REGISTRY[index].key, *key);
            assert_eq!(key.profile().key, *key);
        }
    }

    #[test]
    fn test_registry_keys_unique() {
        let keys: HashSet<_> = PERSONA_REGISTRY.iter().map(|p| p.key).collect();
        assert_eq!(keys.len(), 5);
    }

    #[test]
    fn test_parse_persona_key() {
        assert_eq!("alba".parse::<PersonaKey>().unwrap(), PersonaKey::Alba);
        assert_eq!(" Blerina ".parse::<PersonaKey>().unwrap(), PersonaKey::Blerina);
        assert_eq!("ASI".parse::<PersonaKey>().unwrap(), PersonaKey::Asi);

        let err = "zeus".parse::<PersonaKey>().unwrap_err();
        assert!(matches!(err, KuvendError::InvalidInput(_)));
    }

    #[test]
    fn test_ordering_is_registry_order() {
        let mut keys = vec![PersonaKey::Asi, PersonaKey::Alba, PersonaKey::Jona];
        keys.sort();
        assert_eq!(keys, vec![PersonaKey::Alba, PersonaKey::Jona, PersonaKey::Asi]);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&PersonaKey::Blerina).unwrap();
        assert_eq!(json, "\"blerina\"");

        let level = serde_json::to_string(&ComplexityLevel::Intermediate).unwrap();
        assert_eq!(level, "\"intermediate\"");
    }
}
