// ABOUTME: Main library module for scenario variable actions
// ABOUTME: Exports templating, loaders, user state, actions and the script runner

pub mod actions;
pub mod cli;
pub mod loader;
pub mod script;
pub mod template;
pub mod user;

// Re-export commonly used types
pub use actions::{Action, ActionError, ActionRegistry, Command, SetVariableAction, VariableScope};
pub use cli::{App, Args, Config};
pub use loader::{Loader, LoaderRegistry};
pub use script::{ActionScript, ScriptParser, ScriptRunner};
pub use template::{Params, Rendered, TemplateSource, ValueTemplate};
pub use user::{TextPreprocessingResult, User};

// Error handling
pub type Result<T> = anyhow::Result<T>;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
