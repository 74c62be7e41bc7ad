//! Command line configuration.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;

use crate::markdown::EquationNumbering;
use crate::math::BlahtexCommand;

/// Command line configuration for mathdoc.
#[derive(Debug, Clone, Parser)]
#[command(name = "mathdoc", version, about, long_about = None)]
pub struct Config {
    /// Directory containing markdown pages
    #[arg(default_value = "docs")]
    pub input: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = "dist")]
    pub output: PathBuf,

    /// Project name
    #[arg(long)]
    pub name: Option<String>,

    /// LaTeX to MathML converter program
    #[arg(long, default_value = "blahtexml")]
    pub converter: String,

    /// Argument passed to the converter (repeatable)
    #[arg(long = "converter-arg", default_values_t = vec!["--mathml".to_string()], allow_hyphen_values = true)]
    pub converter_args: Vec<String>,

    /// Number every display equation, not only labelled ones
    #[arg(long)]
    pub number_all: bool,
}

impl Config {
    /// Parses configuration from command line arguments.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Validates configuration.
    ///
    /// # Errors
    ///
    /// Returns error if input path does not exist or converter is empty.
    pub fn validate(&self) -> Result<()> {
        if !self.input.exists() {
            bail!("Input path does not exist: {}", self.input.display());
        }

        if self.converter.trim().is_empty() {
            bail!("Converter program must not be empty");
        }

        Ok(())
    }

    /// Returns project name from configuration or input directory.
    ///
    /// # Errors
    ///
    /// Returns error if input path has no name component or contains invalid UTF8.
    pub fn project_name(&self) -> Result<String> {
        if let Some(name) = &self.name {
            return Ok(name.clone());
        }

        let path = self
            .input
            .canonicalize()
            .unwrap_or_else(|_| self.input.clone());

        path.file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Cannot extract project name from path: {}", path.display()))
            .map(String::from)
    }

    /// Builds converter command from configured program and arguments.
    pub fn converter_command(&self) -> BlahtexCommand {
        BlahtexCommand::new(self.converter.clone(), self.converter_args.iter().cloned())
    }

    /// Returns equation numbering mode.
    pub fn numbering(&self) -> EquationNumbering {
        if self.number_all {
            EquationNumbering::All
        } else {
            EquationNumbering::Labelled
        }
    }
}
