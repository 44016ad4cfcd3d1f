//! Command-line interface for the mapper.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;

use crate::config::MAX_SOURCE_SIZE;
use crate::error::{MapperError, Result};
use crate::output::to_json_string;
use crate::store::{load_config_file, ConfigStore};
use crate::transformer::Transformer;

/// XML Mapper - Convert XML documents to JSON with declarative mappings.
#[derive(Parser)]
#[command(name = "xml-mapper")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transform an XML document using a mapping configuration.
    Transform {
        /// Configuration file (.json, .yaml or .yml)
        #[arg(short, long)]
        config: PathBuf,

        /// Input XML file (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output JSON file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// List the configurations stored in a directory.
    List {
        /// Configuration directory
        #[arg(short, long, default_value = "configs")]
        dir: PathBuf,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Transform {
            config,
            input,
            output,
            compact,
        } => transform_command(&config, input.as_deref(), output.as_deref(), !compact),
        Commands::List { dir } => list_command(&dir),
    }
}

/// Execute the transform command.
fn transform_command(
    config_path: &Path,
    input: Option<&Path>,
    output: Option<&Path>,
    pretty: bool,
) -> Result<()> {
    let config = load_config_file(config_path)?;
    let xml = read_input(input)?;

    let report = Transformer::new().transform_report(&xml, &config)?;
    let json = to_json_string(&report.output, pretty)?;

    if !report.warnings.is_empty() {
        eprintln!(
            "{} {}",
            style("Warnings:").yellow().bold(),
            report.warnings.len()
        );
        for warning in &report.warnings {
            eprintln!("  {} {}", style("-").yellow(), warning);
        }
    }

    match output {
        Some(path) => {
            fs::write(path, format!("{json}\n"))?;
            eprintln!("{} {}", style("Saved to:").green().bold(), path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

/// Read the source document from a file or stdin, bounded in size.
fn read_input(input: Option<&Path>) -> Result<String> {
    let text = match input {
        Some(path) => {
            let size = fs::metadata(path)?.len();
            if size > MAX_SOURCE_SIZE as u64 {
                return Err(MapperError::SourceTooLarge {
                    size: usize::try_from(size).unwrap_or(usize::MAX),
                    max: MAX_SOURCE_SIZE,
                });
            }
            fs::read_to_string(path)?
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .take(MAX_SOURCE_SIZE as u64 + 1)
                .read_to_string(&mut text)?;
            text
        }
    };
    Ok(text)
}

/// Execute the list command.
fn list_command(dir: &Path) -> Result<()> {
    let store = ConfigStore::new(dir);
    let names = store.list()?;

    if names.is_empty() {
        eprintln!(
            "{} {}",
            style("No configurations in").yellow(),
            dir.display()
        );
        return Ok(());
    }

    for name in names {
        println!("{}", style(name).cyan());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_transform() {
        let cli = Cli::parse_from(["xml-mapper", "transform", "--config", "people.json"]);

        let Commands::Transform {
            config,
            input,
            output,
            compact,
        } = cli.command
        else {
            panic!("expected transform command");
        };
        assert_eq!(config, PathBuf::from("people.json"));
        assert!(input.is_none());
        assert!(output.is_none());
        assert!(!compact);
    }

    #[test]
    fn test_cli_parse_transform_with_files() {
        let cli = Cli::parse_from([
            "xml-mapper",
            "transform",
            "-c",
            "people.yaml",
            "-i",
            "person.xml",
            "-o",
            "out.json",
            "--compact",
        ]);

        let Commands::Transform {
            input,
            output,
            compact,
            ..
        } = cli.command
        else {
            panic!("expected transform command");
        };
        assert_eq!(input, Some(PathBuf::from("person.xml")));
        assert_eq!(output, Some(PathBuf::from("out.json")));
        assert!(compact);
    }

    #[test]
    fn test_cli_parse_list_default_dir() {
        let cli = Cli::parse_from(["xml-mapper", "list"]);

        let Commands::List { dir } = cli.command else {
            panic!("expected list command");
        };
        assert_eq!(dir, PathBuf::from("configs"));
    }
}
