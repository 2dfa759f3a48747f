//! Locale support for Kuvend.
//!
//! The tagging stage of the reasoning cycle looks for locale-specific marker
//! substrings. They live here as constants so the cycle itself carries no
//! hardcoded vocabulary.

use serde::{Deserialize, Serialize};

/// Albanian marker for "how" questions.
pub const SQ_HOW_MARKER: &str = "si";
/// Albanian marker for creation intent ("krijo", "krijoj", "krijojmë", ...).
pub const SQ_CREATE_MARKER: &str = "krijo";
pub const EN_HOW_MARKER: &str = "how";
pub const EN_CREATE_MARKER: &str = "create";

/// Output and matching language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    Albanian,
    English,
}

/// Substrings the tagging stage matches against normalized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Markers {
    pub how: &'static str,
    pub create: &'static str,
}

impl Language {
    /// Parse a language name or code. Unknown values fall back to Albanian.
    pub fn from_string(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    /// Strict parse, `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sq" | "al" | "albanian" | "shqip" => Some(Language::Albanian),
            "en" | "english" => Some(Language::English),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::Albanian => "sq",
            Language::English => "en",
        }
    }

    pub fn markers(&self) -> Markers {
        match self {
            Language::Albanian => Markers {
                how: SQ_HOW_MARKER,
                create: SQ_CREATE_MARKER,
            },
            Language::English => Markers {
                how: EN_HOW_MARKER,
                create: EN_CREATE_MARKER,
            },
        }
    }
}
