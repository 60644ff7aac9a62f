use anyhow::Result;
use clap::{Parser, ValueEnum};
use console::style;
use datashape::{json_path, TypeScriptGenerator};

use super::ProjectArgs;

/// Output format of the generate command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// TypeScript definition file.
    Ts,
    /// JSON array of `{ name, transformed }`, written next to the
    /// definition file unless `--output` is given.
    Json,
}

/// Generate TypeScript definitions.
#[derive(Parser)]
pub struct GenerateCommand {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Print to stdout instead of writing the definition file.
    #[arg(long)]
    pub stdout: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Ts)]
    pub format: OutputFormat,
}

impl GenerateCommand {
    /// Execute the generate command.
    pub fn execute(self) -> Result<()> {
        let project = self.project.load()?;
        let generator = TypeScriptGenerator::new(project.config.typescript.clone());

        if self.stdout {
            let content = match self.format {
                OutputFormat::Ts => generator.generate(&project.registry)?,
                OutputFormat::Json => generator.generate_json(&project.registry)?,
            };
            print!("{}", content);
            return Ok(());
        }

        let output = match self.format {
            OutputFormat::Ts => {
                let output = project.output().to_path_buf();
                generator.write(&project.registry, &output)?;
                output
            }
            OutputFormat::Json => {
                let output = match &self.project.output {
                    Some(output) => output.clone(),
                    None => json_path(project.output()),
                };
                generator.write_json(&project.registry, &output)?;
                output
            }
        };

        println!(
            "{} Generated {}",
            style("✓").green(),
            style(output.display()).cyan()
        );
        Ok(())
    }
}
