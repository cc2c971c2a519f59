pub mod config;
pub mod logging;

pub mod content_type;
pub mod copy_tool;
pub mod deploy;
pub mod error;
pub mod index_rewrite;
pub mod inputs;
pub mod redact;
pub mod sas;
pub mod workflow;
