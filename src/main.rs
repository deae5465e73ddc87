//! Filemod CLI
//!
//! Computes and applies file system commands for a directory tree.

use anyhow::{Context, Result};
use clap::Parser;
use filemod::{DiskFs, DiskLister};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "filemod")]
#[command(author, version, about = "Restructure codebases with declarative path rules")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Transform a directory using a transform file
    Transform {
        /// Declarative filemod (.yml, .yaml or .toml)
        transform_file_path: PathBuf,

        /// Directory the transform runs against
        root_directory_path: PathBuf,

        /// Print the commands instead of executing them
        #[arg(short, long)]
        dry_run: bool,

        /// Print commands as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a transform file and run its embedded tests
    Check {
        /// Declarative filemod (.yml, .yaml or .toml)
        transform_file_path: PathBuf,

        /// Root directory the embedded tests assume
        #[arg(long, default_value = "/")]
        root: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    if cfg!(windows) {
        anyhow::bail!("The filemod engine does not support Windows");
    }

    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("FILEMOD_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Transform {
            transform_file_path,
            root_directory_path,
            dry_run,
            json,
        } => {
            let transform = filemod::load_transform(&transform_file_path)
                .await
                .with_context(|| {
                    format!("Failed to load transform {}", transform_file_path.display())
                })?;

            let root = filemod::discovery::resolve_root(&root_directory_path)?;
            let lister = DiskLister::new(&root);

            let (commands, summary) = filemod::run(&transform, &root, &lister, &DiskFs, dry_run)
                .await
                .with_context(|| format!("Failed to transform {}", root.display()))?;

            if dry_run {
                if json {
                    println!("{}", serde_json::to_string_pretty(&commands)?);
                } else {
                    for command in &commands {
                        println!("  [dry-run] {}", command);
                    }
                }
            }

            if let Some(summary) = summary {
                info!(
                    "Applied {} commands ({} deleted, {} moved, {} copied, {} created)",
                    summary.total(),
                    summary.deleted,
                    summary.moved,
                    summary.copied,
                    summary.created
                );
            }
        }
        Commands::Check {
            transform_file_path,
            root,
        } => match filemod::load_transform(&transform_file_path).await {
            Ok(transform) => {
                let rules = transform.rules();
                println!("✓ Filemod is valid");
                println!("  {} delete rules", rules.delete_rules.len());
                println!("  {} replace rules", rules.replace_rules.len());
                println!("  {} copy rules", rules.copy_rules.len());

                let passed = transform
                    .run_document_tests(&root)
                    .await
                    .context("Embedded test failed")?;
                println!("  {} tests passed", passed);
            }
            Err(e) => {
                eprintln!("✗ Filemod error: {}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
