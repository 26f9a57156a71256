// ABOUTME: Command line argument definitions and parsing using Clap
// ABOUTME: Defines the main CLI structure and the run and validate subcommands

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

use crate::template::Params;

#[derive(Parser)]
#[command(name = "scenario-vars")]
#[command(about = "Run scenario variable actions from a YAML script")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run every action in a script and print the resulting variables
    Run {
        #[arg(help = "Path to action script YAML file")]
        script: PathBuf,

        #[arg(
            short = 'V',
            long = "var",
            help = "Bind a template param for the script user (key=value)"
        )]
        vars: Vec<String>,

        #[arg(short, long, help = "Write the JSON report to this file")]
        output: Option<PathBuf>,
    },

    /// Check that every action in a script can be built
    Validate {
        #[arg(help = "Path to action script YAML file")]
        script: PathBuf,
    },
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parse variables from key=value format
    pub fn parse_variables(vars: &[String]) -> anyhow::Result<Params> {
        let mut variables = Params::new();

        for var in vars {
            if let Some((key, value)) = var.split_once('=') {
                variables.insert(key.to_string(), Value::String(value.to_string()));
            } else {
                return Err(anyhow::anyhow!(
                    "Invalid variable format '{}'. Expected 'key=value'",
                    var
                ));
            }
        }

        Ok(variables)
    }
}
