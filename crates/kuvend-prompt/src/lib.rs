//! Deterministic text synthesis: the reasoning cycle and the persona debate.

pub mod cycle;
pub mod debate;
pub mod templates;
pub mod traits;

pub use cycle::{run_cycle, ReasoningCycle, HIGH_LOAD_TOKEN_THRESHOLD, STATEMENT_TOKEN_THRESHOLD};
pub use debate::{debate, DebateEngine, TemplatePersona};
pub use templates::CYCLE_ID;
pub use traits::Persona;
