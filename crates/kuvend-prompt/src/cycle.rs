//! The four-stage deterministic reasoning cycle.

use kuvend_core::{
    ClassifiedType, ContentType, Intake, Intent, KuvendError, Load, PipelineResult, ReasoningStep,
    Result, StepKind, Tags,
};
use kuvend_i18n::Language;

use crate::templates::{render_banner, render_step, CYCLE_ID};

/// Inputs with more whitespace tokens than this are statements.
pub const STATEMENT_TOKEN_THRESHOLD: usize = 20;

/// Inputs with more whitespace tokens than this carry a high load.
pub const HIGH_LOAD_TOKEN_THRESHOLD: usize = 50;

/// Pure, total pipeline: intake, tagging, reasoning, draft.
///
/// No I/O, no randomness and no shared state; identical input always gives
/// a byte-identical [`PipelineResult`]. Safe to call from any number of
/// threads at once.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReasoningCycle {
    language: Language,
}

impl ReasoningCycle {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Run all four stages. Fails only on an empty (or whitespace-only) prompt.
    pub fn run(&self, prompt: &str) -> Result<PipelineResult> {
        if prompt.trim().is_empty() {
            return Err(KuvendError::invalid_input("prompt must not be empty"));
        }

        let intake = self.intake(prompt);
        let tags = self.tag(&intake);
        let reasoning_steps = self.reason();

        let draft = reasoning_steps
            .iter()
            .map(ReasoningStep::render)
            .collect::<Vec<_>>()
            .join("\n");
        let final_text = format!("{}{}", render_banner(self.language), draft);

        Ok(PipelineResult {
            intake,
            tags,
            reasoning_steps,
            draft,
            final_text,
            cycle_id: CYCLE_ID.to_string(),
        })
    }

    fn intake(&self, prompt: &str) -> Intake {
        let normalized = prompt.to_lowercase().trim().to_string();
        let classified_type = if token_count(&normalized) > STATEMENT_TOKEN_THRESHOLD {
            ClassifiedType::Statement
        } else {
            ClassifiedType::Question
        };

        Intake {
            raw: prompt.to_string(),
            normalized,
            classified_type,
        }
    }

    fn tag(&self, intake: &Intake) -> Tags {
        let markers = self.language.markers();
        let text = intake.normalized.as_str();

        let content_type = if text.contains(markers.how) {
            ContentType::HowTo
        } else {
            ContentType::What
        };
        let intent = if text.contains(markers.create) {
            Intent::Create
        } else {
            Intent::Analyze
        };
        let load = if token_count(text) > HIGH_LOAD_TOKEN_THRESHOLD {
            Load::High
        } else {
            Load::Low
        };

        Tags {
            content_type,
            intent,
            load,
        }
    }

    fn reason(&self) -> Vec<ReasoningStep> {
        StepKind::ORDERED
            .iter()
            .zip(1u8..)
            .map(|(kind, order)| ReasoningStep {
                order,
                kind: *kind,
                content: render_step(*kind, self.language).to_string(),
            })
            .collect()
    }
}

/// Run the cycle with the default (Albanian) locale.
pub fn run_cycle(prompt: &str) -> Result<PipelineResult> {
    ReasoningCycle::default().run(prompt)
}

fn token_count(text: &str) -> usize {
    text.split_whitespace().count()
}
