//! taxsheets CLI - Convert raw taxonomy exports into worksheet CSVs

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};

use taxsheets::{
    worksheet_path, ConceptConverter, ConceptOptions, ConversionStats, PresentationConverter,
    WorksheetKind,
};

/// Taxonomy worksheet generator
#[derive(ClapParser)]
#[command(name = "taxsheets")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the concepts worksheet
    Concepts {
        /// Taxonomy year used in the output file name
        #[arg(long)]
        year: i32,

        /// Raw concepts export (CSV)
        #[arg(long)]
        raw_concepts: PathBuf,

        /// Output directory
        #[arg(long)]
        out_dir: PathBuf,

        /// Prefix of the concepts to keep
        #[arg(long, default_value = "us-gaap")]
        prefix: String,

        /// Print run statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate the role-aware presentation worksheet
    Presentation {
        /// Taxonomy year used in the output file name
        #[arg(long)]
        year: i32,

        /// Raw presentation export (CSV)
        #[arg(long)]
        raw_pre: PathBuf,

        /// Output directory
        #[arg(long)]
        out_dir: PathBuf,

        /// Print run statistics as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Concepts {
            year,
            raw_concepts,
            out_dir,
            prefix,
            json,
        } => {
            let out_path = worksheet_path(&out_dir, WorksheetKind::Concepts, year);
            let converter = ConceptConverter::with_options(ConceptOptions {
                target_prefix: prefix.into(),
            });
            let stats = converter
                .convert_file(&raw_concepts, &out_path)
                .with_context(|| format!("Failed to convert {}", raw_concepts.display()))?;
            report(&out_path, &stats, json)?;
        }

        Commands::Presentation {
            year,
            raw_pre,
            out_dir,
            json,
        } => {
            let out_path = worksheet_path(&out_dir, WorksheetKind::Presentation, year);
            let stats = PresentationConverter::new()
                .convert_file(&raw_pre, &out_path)
                .with_context(|| format!("Failed to convert {}", raw_pre.display()))?;
            report(&out_path, &stats, json)?;
        }
    }

    Ok(())
}

fn report(out_path: &Path, stats: &ConversionStats, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(stats)?);
        return Ok(());
    }

    println!("{} {}", "✓".green().bold(), out_path.display());
    println!("  Rows read: {}", stats.rows_read);
    println!("  Records: {}", stats.records_written);
    println!("  Skipped: {}", stats.rows_skipped);
    if stats.roles > 0 {
        println!("  Roles: {}", stats.roles);
    }
    println!("  Time: {}ms", stats.duration_ms);
    Ok(())
}
