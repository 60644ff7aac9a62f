mod check;
mod generate;

pub use check::CheckCommand;
pub use generate::GenerateCommand;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use datashape::{parse_project, schema::SchemaRegistry, DataShapeConfig};
use tracing::info;

/// datashape - TypeScript definitions for Rust data records
#[derive(Parser)]
#[command(name = "datashape")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Generate TypeScript definitions.
    Generate(GenerateCommand),

    /// Fail if the definition file is out of date.
    Check(CheckCommand),
}

impl Cli {
    /// Execute the CLI command.
    pub fn execute(self) -> Result<()> {
        let log_level = if self.verbose { "debug" } else { "info" };
        tracing_subscriber::fmt()
            .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()))
            .with_writer(std::io::stderr)
            .init();

        match self.command {
            Commands::Generate(cmd) => cmd.execute(),
            Commands::Check(cmd) => cmd.execute(),
        }
    }
}

/// Options shared by every command that reads a project.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Configuration file path.
    #[arg(short, long, default_value = "datashape.toml")]
    pub config: PathBuf,

    /// Source directory to scan for data records (overrides config).
    #[arg(short, long)]
    pub src: Option<PathBuf>,

    /// Definition file (overrides config).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// A loaded project: configuration with overrides applied and its records.
pub struct Project {
    pub config: DataShapeConfig,
    pub registry: SchemaRegistry,
}

impl ProjectArgs {
    /// Load configuration, apply overrides and reflect the sources.
    pub fn load(&self) -> Result<Project> {
        let mut config = DataShapeConfig::load_or_default(&self.config)
            .with_context(|| format!("Failed to load {}", self.config.display()))?;

        // Apply command-line overrides
        if let Some(src) = &self.src {
            config.project.src = src.clone();
        }
        if let Some(output) = &self.output {
            config.project.output = output.clone();
        }

        info!("Scanning {}", config.project.src.display());
        let registry = parse_project(&config.project.src)?;

        Ok(Project { config, registry })
    }
}

impl Project {
    pub fn output(&self) -> &Path {
        &self.config.project.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_generate() {
        let cli = Cli::try_parse_from([
            "datashape",
            "generate",
            "--src",
            "app",
            "--output",
            "types.ts",
            "--stdout",
        ]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::try_parse_from(["datashape", "-v", "check", "--config", "other.toml"]);
        let cli = cli.unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Check(cmd) => assert_eq!(cmd.project.config, PathBuf::from("other.toml")),
            Commands::Generate(_) => panic!("expected check"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        let cli = Cli::try_parse_from(["datashape", "generate", "--format", "yaml"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_project_args_overrides() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("song.rs"),
            "#[data] pub struct SongData { pub title: String }",
        )
        .unwrap();

        let args = ProjectArgs {
            config: dir.path().join("missing.toml"),
            src: Some(dir.path().to_path_buf()),
            output: Some(dir.path().join("out.d.ts")),
        };

        let project = args.load().unwrap();
        assert_eq!(project.output(), dir.path().join("out.d.ts"));
        assert!(project.registry.is_data("SongData"));
    }
}
