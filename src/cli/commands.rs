// ABOUTME: Command implementations for the scenario-vars CLI
// ABOUTME: Handles execution of the run and validate commands

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use super::config::Config;
use crate::actions::ActionRegistry;
use crate::loader::LoaderRegistry;
use crate::script::{ScriptParser, ScriptRunner};

/// Build a runner whose actions share one loader registry
fn build_runner(config: &Config) -> ScriptRunner {
    let loaders = Arc::new(LoaderRegistry::new().with_strict(config.strict_loaders));
    ScriptRunner::new(ActionRegistry::with_loaders(loaders))
        .with_default_ttl(config.variables.default_ttl)
}

/// Run every action in a script
pub async fn run_script(script_path: PathBuf, output: Option<PathBuf>, config: &Config) -> Result<()> {
    info!("Loading script: {}", script_path.display());

    let mut script = ScriptParser::new()
        .parse_file(&script_path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to parse script: {}", e))?;
    script.merge_params(config.params.clone());

    let report = build_runner(config)
        .run(&script)
        .await
        .map_err(|e| anyhow::anyhow!("Script '{}' failed: {}", script.name, e))?;

    let json_content = serde_json::to_string_pretty(&report)
        .map_err(|e| anyhow::anyhow!("Failed to serialize report to JSON: {}", e))?;

    match output {
        Some(output_path) => {
            std::fs::write(&output_path, json_content).map_err(|e| {
                anyhow::anyhow!(
                    "Failed to write output file '{}': {}",
                    output_path.display(),
                    e
                )
            })?;
            info!("Report written to: {}", output_path.display());
        }
        None => println!("{}", json_content),
    }

    Ok(())
}

/// Validate a script by building all of its actions
pub async fn validate_script(script_path: PathBuf, config: &Config) -> Result<()> {
    info!("Validating script: {}", script_path.display());

    let script = ScriptParser::new()
        .parse_file(&script_path)
        .await
        .map_err(|e| anyhow::anyhow!("Script validation failed: {}", e))?;

    let actions = build_runner(config)
        .build_actions(&script)
        .map_err(|e| anyhow::anyhow!("Script validation failed: {}", e))?;

    println!("✓ Script '{}' is valid", script.name);
    println!("  Actions: {}", actions.len());
    for action in &actions {
        println!("    - {}", action.action_type());
    }

    Ok(())
}
