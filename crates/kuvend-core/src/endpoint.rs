//! Request endpoints understood by the orchestrator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KuvendError;

/// Which computation serves a request on a cache miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    /// Deterministic reasoning cycle.
    #[default]
    Cycle,
    /// Persona debate panel.
    Debate,
    /// Cycle and debate together.
    Combined,
    /// External generation collaborator.
    Generate,
}

impl Endpoint {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Cycle => "cycle",
            Endpoint::Debate => "debate",
            Endpoint::Combined => "combined",
            Endpoint::Generate => "generate",
        }
    }

    /// True when a miss is served outside the deterministic core.
    #[must_use]
    pub fn is_external(&self) -> bool {
        matches!(self, Endpoint::Generate)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Endpoint {
    type Err = KuvendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cycle" => Ok(Endpoint::Cycle),
            "debate" => Ok(Endpoint::Debate),
            "combined" => Ok(Endpoint::Combined),
            "generate" => Ok(Endpoint::Generate),
            other => Err(KuvendError::invalid_input(format!(
                "unknown endpoint '{}'",
                other
            ))),
        }
    }
}
