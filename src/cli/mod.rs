pub mod args;
pub mod commands;
pub mod root;

pub use args::{validate_args, Args, Commands};
pub use root::RootCommand;
