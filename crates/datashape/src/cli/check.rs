use anyhow::{bail, Result};
use clap::Parser;
use console::style;
use datashape::TypeScriptGenerator;
use datashape::text::normalize_newlines;

use super::ProjectArgs;

/// Fail if the definition file differs from a fresh generation.
#[derive(Parser)]
pub struct CheckCommand {
    #[command(flatten)]
    pub project: ProjectArgs,
}

impl CheckCommand {
    /// Execute the check command.
    pub fn execute(self) -> Result<()> {
        let project = self.project.load()?;
        let generator = TypeScriptGenerator::new(project.config.typescript.clone());
        let expected = generator.generate(&project.registry)?;

        let output = project.output();
        let current = match std::fs::read_to_string(output) {
            Ok(current) => current,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                bail!(
                    "{} does not exist. Run `datashape generate` first.",
                    output.display()
                );
            }
            Err(e) => return Err(e.into()),
        };

        if normalize_newlines(&current) != normalize_newlines(&expected) {
            bail!(
                "{} is out of date. Run `datashape generate` to update it.",
                output.display()
            );
        }

        println!(
            "{} {} is up to date",
            style("✓").green(),
            style(output.display()).cyan()
        );
        Ok(())
    }
}
