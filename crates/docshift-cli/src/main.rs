//! docshift - one-shot schema migration between document databases.
//!
//! Copies collection existence, shard keys, and secondary indexes from
//! a source deployment to a destination deployment, driven by a
//! declarative JSON selection file. Documents themselves are never
//! moved.

use clap::Parser;
use docshift_core::{resolve, CatalogSnapshot, SchemaReconciler, SelectionConfig};
use docshift_mongo::MongoCatalog;
use std::path::PathBuf;

/// Document database schema migration tool
#[derive(Parser, Debug)]
#[command(name = "docshift")]
#[command(version, about = "Document database schema migration tool")]
pub struct Args {
    /// Source connection string
    #[arg(long)]
    pub source_uri: String,

    /// Destination connection string
    #[arg(long)]
    pub dest_uri: String,

    /// Path to the JSON selection configuration file
    #[arg(long)]
    pub config_file: PathBuf,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("docshift=info".parse().unwrap())
                .add_directive("docshift_core=info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(&args.config_file)?;
    let config = SelectionConfig::from_json_str(&contents)?;

    tracing::info!(
        config_file = %args.config_file.display(),
        sections = config.sections.len(),
        "loaded selection configuration"
    );

    let source = MongoCatalog::connect(&args.source_uri).await?;
    let destination = MongoCatalog::connect(&args.dest_uri).await?;

    // One immutable snapshot per run; selection never re-queries the
    // source catalog.
    let snapshot = CatalogSnapshot::load(&source).await?;
    let resolved = resolve(&config.sections, &snapshot)?;
    tracing::info!(collections = resolved.len(), "selection resolved");

    let reconciler = SchemaReconciler::new(&source, &destination);
    let report = reconciler.run(resolved.into_values()).await?;

    println!(
        "Migrated {} collection(s), {} failed.",
        report.migrated.len(),
        report.failed.len()
    );
    for (namespace, err) in &report.failed {
        eprintln!("  failed {}: {}", namespace, err);
    }

    if !report.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
