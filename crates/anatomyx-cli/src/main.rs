//! anatomyx: gene expression on anatomograms.
//! Entry point for the command line tool.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "anatomyx")]
#[command(about = "Validate, summarize, color and export gene expression data", version)]
struct Cli {
    /// Configuration file (defaults to $ANATOMYX_CONFIG, then ./anatomyx.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dataset statistics and per-gene summaries
    Summary {
        /// Expression file (.json, .csv or .tsv)
        file: PathBuf,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Per-tissue colors and tooltips for one gene
    Render {
        file: PathBuf,
        /// Gene to show (first gene when omitted)
        #[arg(long)]
        gene: Option<String>,
        #[arg(long)]
        palette: Option<String>,
        /// linear or log
        #[arg(long)]
        scale: Option<String>,
        #[arg(long)]
        threshold: Option<f64>,
        /// male or female
        #[arg(long)]
        sex: Option<String>,
        /// JSON map of tissue id to display name
        #[arg(long)]
        names: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Write the threshold-filtered dataset as JSON
    Export {
        file: PathBuf,
        #[arg(long)]
        threshold: Option<f64>,
        /// Recorded in the export metadata
        #[arg(long)]
        gene: Option<String>,
        /// Output path (default: filtered_expression_<timestamp>.json)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write one gene's values as JSON
    Gene {
        file: PathBuf,
        gene: String,
        #[arg(long)]
        threshold: Option<f64>,
        /// Output path (default: <gene>_expression_<timestamp>.json)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("anatomyx=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Summary { file, json } => commands::summary(&file, json),
        Commands::Render {
            file,
            gene,
            palette,
            scale,
            threshold,
            sex,
            names,
            json,
        } => {
            let overrides = commands::RenderOverrides {
                gene,
                palette,
                scale,
                threshold,
                sex,
                names,
            };
            commands::render(&file, &config, overrides, json)
        }
        Commands::Export {
            file,
            threshold,
            gene,
            out,
        } => commands::export(&file, threshold.unwrap_or(config.view.threshold), gene, out),
        Commands::Gene {
            file,
            gene,
            threshold,
            out,
        } => commands::gene(&file, &gene, threshold.unwrap_or(config.view.threshold), out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render_flags() {
        let cli = Cli::try_parse_from([
            "anatomyx", "render", "data.csv", "--gene", "TP53", "--scale", "log", "--threshold", "0.5",
        ])
        .unwrap();
        match cli.command {
            Commands::Render {
                gene, scale, threshold, ..
            } => {
                assert_eq!(gene.as_deref(), Some("TP53"));
                assert_eq!(scale.as_deref(), Some("log"));
                assert_eq!(threshold, Some(0.5));
            }
            _ => panic!("expected render"),
        }
    }
}
