// ABOUTME: Action scripts: a user context plus a flat list of actions to run in order
// ABOUTME: Exports the script parser, the runner and the resulting report

pub mod action_script;
pub mod error;
pub mod runner;

pub use action_script::{ActionScript, ScriptParser, ScriptUser};
pub use error::{Result, ScriptError};
pub use runner::{ScriptReport, ScriptRunner};
