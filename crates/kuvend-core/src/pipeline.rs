//! Reasoning cycle artifact types.

use serde::{Deserialize, Serialize};

/// Coarse shape of the input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifiedType {
    Statement,
    Question,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    HowTo,
    What,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Create,
    Analyze,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Load {
    High,
    Low,
}

/// Kind of a reasoning step. The cycle always emits these four, in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Define,
    Context,
    Inference,
    Validation,
}

impl StepKind {
    pub const ORDERED: [StepKind; 4] = [
        StepKind::Define,
        StepKind::Context,
        StepKind::Inference,
        StepKind::Validation,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Define => "define",
            StepKind::Context => "context",
            StepKind::Inference => "inference",
            StepKind::Validation => "validation",
        }
    }
}

impl ClassifiedType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifiedType::Statement => "statement",
            ClassifiedType::Question => "question",
        }
    }
}

impl ContentType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::HowTo => "how_to",
            ContentType::What => "what",
        }
    }
}

impl Intent {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Create => "create",
            Intent::Analyze => "analyze",
        }
    }
}

impl Load {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Load::High => "high",
            Load::Low => "low",
        }
    }
}

/// Stage 1 output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intake {
    pub raw: String,
    pub normalized: String,
    pub classified_type: ClassifiedType,
}

/// Stage 2 output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tags {
    pub content_type: ContentType,
    pub intent: Intent,
    pub load: Load,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningStep {
    pub order: u8,
    pub kind: StepKind,
    pub content: String,
}

impl ReasoningStep {
    /// `"{order}. {kind}: {content}"`
    #[must_use]
    pub fn render(&self) -> String {
        format!("{}. {}: {}", self.order, self.kind.as_str(), self.content)
    }
}

/// The full artifact of one reasoning cycle. Owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub intake: Intake,
    pub tags: Tags,
    pub reasoning_steps: Vec<ReasoningStep>,
    pub draft: String,
    #[serde(rename = "final")]
    pub final_text: String,
    pub cycle_id: String,
}
