pub mod cycle;
pub mod debate;
pub mod personas;
pub mod resolve;
pub mod session;

pub use cycle::run_cycle_command;
pub use debate::run_debate_command;
pub use personas::run_personas_command;
pub use resolve::run_resolve_command;
pub use session::run_session_command;
