use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use roster_lens::builder::ReferenceBuilder;
use roster_lens::config::AppConfig;
use roster_lens::fetch::Fetcher;
use roster_lens::reference::{
    resolve_faction, DirectoryStore, HttpStore, ReferenceLoader, ReferenceStore,
};
use roster_lens::roster::clean_rule_text;
use roster_lens::session::{RosterView, Session};

#[derive(Parser)]
#[command(name = "roster-lens")]
#[command(about = "Warhammer 40k roster viewer with reference datasheet matching")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download source tables and generate reference documents
    BuildReference {
        /// Re-download tables even when cached
        #[arg(long)]
        force: bool,
    },

    /// Show a roster export enriched with reference data
    View {
        /// Roster JSON export
        path: PathBuf,

        /// Read reference documents from this URL instead of the data directory
        #[arg(long)]
        reference_url: Option<String>,
    },

    /// Show which reference faction a catalogue name resolves to
    MatchFaction {
        /// Catalogue name, e.g. "Imperium - Adeptus Custodes"
        catalogue: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    let log_level = cli.log_level.unwrap_or_else(|| config.log_level.clone());

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting roster-lens v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::BuildReference { force } => {
            let fetcher = Fetcher::new(config.fetcher_config())?;
            let builder = ReferenceBuilder::new(fetcher, config.storage(), config.source_url()?);

            let report = builder.run(force).await?;

            println!("\n=== Reference Build ===");
            println!("Factions written:   {}", report.factions_written);
            println!("Datasheets:         {}", report.datasheets_written);
            println!("Core stratagems:    {}", report.core_stratagems);
            println!(
                "Tables:             {} downloaded, {} cached",
                report.tables_downloaded, report.tables_from_cache
            );
            if let Some(last_update) = &report.last_update {
                println!("Source updated:     {}", last_update);
            }
            println!("Output:             {}", config.storage().reference_dir().display());
        }

        Commands::View {
            path,
            reference_url,
        } => {
            let text = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;

            let mut session = Session::new();
            let generation = session.load_roster(&text)?;

            let store = open_store(&config, reference_url.as_deref())?;
            let loader = ReferenceLoader::new(store);
            if let Some(roster) = session.roster() {
                let reference = loader.load_for_catalogue(&roster.catalogue_name).await;
                session.apply_reference(generation, reference);
            }

            if let Some(view) = session.view(config.view.theme_override) {
                print_view(&view);
            }
        }

        Commands::MatchFaction { catalogue } => {
            let store = DirectoryStore::new(config.storage());
            let index = store
                .index()
                .await
                .context("Reference index not found; run build-reference first")?;

            match resolve_faction(&catalogue, &index) {
                Some(faction) => println!(
                    "{} -> {} ({}, {} datasheets)",
                    catalogue, faction.name, faction.id, faction.datasheet_count
                ),
                None => println!("{} -> no match", catalogue),
            }
        }
    }

    Ok(())
}

fn open_store(config: &AppConfig, reference_url: Option<&str>) -> Result<Arc<dyn ReferenceStore>> {
    match reference_url {
        Some(raw) => {
            let base_url = Url::parse(raw).with_context(|| format!("Invalid URL: {}", raw))?;
            let fetcher = Fetcher::new(config.fetcher_config())?;
            Ok(Arc::new(HttpStore::new(fetcher.client().clone(), base_url)))
        }
        None => Ok(Arc::new(DirectoryStore::new(config.storage()))),
    }
}

fn print_view(view: &RosterView<'_>) {
    let roster = view.roster;

    println!("\n=== {} ===", roster.army_name);
    println!("Catalogue:  {}", roster.catalogue_name);
    println!("Points:     {}", roster.total_points);
    println!("Theme:      {}", view.theme);

    match (&roster.detachment_name, view.detachment) {
        (Some(name), Some(detachment)) => {
            println!("Detachment: {} (matched '{}')", name, detachment.name);
            for rule in &detachment.rules {
                println!("  - {}", rule.name);
            }
            println!(
                "  {} enhancements, {} stratagems",
                detachment.enhancements.len(),
                detachment.stratagems.len()
            );
        }
        (Some(name), None) => println!("Detachment: {}", name),
        (None, _) => println!("Detachment: unknown"),
    }

    if !roster.army_rules.is_empty() {
        println!("\nArmy rules:");
        for rule in &roster.army_rules {
            println!("  {}: {}", rule.name, clean_rule_text(&rule.description));
        }
    }

    println!("\nUnits:");
    for entry in &view.units {
        let unit = entry.unit;
        let status = match (view.reference_loaded, entry.datasheet) {
            (_, Some(datasheet)) => format!("datasheet {}", datasheet.id),
            (true, None) => "no datasheet".to_string(),
            (false, None) => "no reference".to_string(),
        };
        println!(
            "  {:<40} {:>4} pts  W{}  [{}]",
            unit.display_name(),
            unit.cost,
            unit.max_wounds,
            status
        );
        for leader in &entry.attached_leaders {
            println!("    + {}", leader.display_name());
        }
    }

    if view.reference_loaded {
        println!(
            "\n{}/{} units matched reference datasheets",
            view.matched_units(),
            view.units.len()
        );
    }
}
