//! Template text for the reasoning cycle and the persona panel.

use kuvend_core::{PersonaKey, StepKind};
use kuvend_i18n::Language;

/// Tag identifying this pipeline version. Stable across calls.
pub const CYCLE_ID: &str = "kuvend-cycle/v1";

/// Render the banner prefixed to the final text.
pub fn render_banner(language: Language) -> &'static str {
    match language {
        Language::Albanian => "Përgjigje e strukturuar (cikli i arsyetimit):\n",
        Language::English => "Structured answer (reasoning cycle):\n",
    }
}

/// Render the content of a reasoning step. Independent of the prompt.
pub fn render_step(kind: StepKind, language: Language) -> &'static str {
    match (language, kind) {
        (Language::Albanian, StepKind::Define) => "Përcakto qartë problemin dhe termat kryesorë.",
        (Language::Albanian, StepKind::Context) => {
            "Vendos pyetjen në kontekstin e saj praktik dhe teorik."
        }
        (Language::Albanian, StepKind::Inference) => {
            "Nxirr përfundime nga informacioni i disponueshëm."
        }
        (Language::Albanian, StepKind::Validation) => {
            "Verifiko që përfundimet janë të qëndrueshme dhe të zbatueshme."
        }
        (Language::English, StepKind::Define) => "Clearly define the problem and its key terms.",
        (Language::English, StepKind::Context) => {
            "Place the question in its practical and theoretical context."
        }
        (Language::English, StepKind::Inference) => "Draw conclusions from the available information.",
        (Language::English, StepKind::Validation) => {
            "Check that the conclusions are consistent and actionable."
        }
    }
}

/// Render a persona's perspective on `prompt`.
pub fn render_persona(key: PersonaKey, language: Language, prompt: &str) -> String {
    match (language, key) {
        (Language::Albanian, PersonaKey::Alba) => format!(
            "Alba (shkencëtare): Duke analizuar \"{}\" me të dhëna dhe metodë shkencore, hapi i parë është të formulojmë një hipotezë të testueshme.",
            prompt
        ),
        (Language::Albanian, PersonaKey::Albi) => format!(
            "Albi (inxhinier): Për \"{}\", do ta ndaja problemin në komponentë dhe do të ndërtoja një prototip të vogël që në fillim.",
            prompt
        ),
        (Language::Albanian, PersonaKey::Jona) => format!(
            "Jona (etikë dhe shoqëri): Kur mendojmë për \"{}\", duhet të pyesim kë prek dhe si mund ta bëjmë të drejtë për të gjithë.",
            prompt
        ),
        (Language::Albanian, PersonaKey::Blerina) => format!(
            "Blerina (edukatore): Le ta marrim \"{}\" hap pas hapi, duke filluar nga bazat, që çdokush ta kuptojë.",
            prompt
        ),
        (Language::Albanian, PersonaKey::Asi) => format!(
            "ASI (sintezë): Duke bashkuar të gjitha këndvështrimet mbi \"{}\", strategjia më e mirë kombinon provën, ndërtimin, ndjeshmërinë dhe mësimin.",
            prompt
        ),
        (Language::English, PersonaKey::Alba) => format!(
            "Alba (scientist): Looking at \"{}\" through data and method, the first step is to state a testable hypothesis.",
            prompt
        ),
        (Language::English, PersonaKey::Albi) => format!(
            "Albi (engineer): For \"{}\", I would split the problem into components and build a small prototype early.",
            prompt
        ),
        (Language::English, PersonaKey::Jona) => format!(
            "Jona (ethics and society): When we think about \"{}\", we should ask who it affects and how to make it fair for everyone.",
            prompt
        ),
        (Language::English, PersonaKey::Blerina) => format!(
            "Blerina (educator): Let's take \"{}\" step by step, starting from the basics, so anyone can follow.",
            prompt
        ),
        (Language::English, PersonaKey::Asi) => format!(
            "ASI (synthesis): Bringing every perspective on \"{}\" together, the best strategy combines evidence, building, empathy and learning.",
            prompt
        ),
    }
}
