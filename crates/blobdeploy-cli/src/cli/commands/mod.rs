//! CLI command handlers. Each command is in its own file.

mod completions;
mod deploy;
mod man;
mod plan;

pub use completions::run_completions;
pub use deploy::run_deploy;
pub use man::run_man;
pub use plan::run_plan;
