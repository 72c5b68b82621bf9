//! Reference data builder.
//!
//! Downloads the relational source tables, joins them, and writes one JSON
//! document per faction plus the faction index and the core stratagems.
//! The viewer only ever reads what this produces.

pub mod csv;
pub mod datasheet;
pub mod detachment;
pub mod tables;

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::fetch::{FetchError, Fetcher};
use crate::models::{FactionDocument, FactionSummary, Stratagem};
use crate::storage::{self, StorageConfig, StorageError};

pub use datasheet::{DatasheetJoin, LeaderIndex, SourceClassification};
pub use detachment::{build_detachments, core_stratagems};
pub use tables::{SourceTable, SourceTables};

use self::csv::field;
use self::detachment::compare_names;

/// Errors that can occur while building reference documents.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid source URL: {0}")]
    InvalidUrl(String),

    #[error("Missing source table: {0}")]
    MissingTable(&'static str),
}

/// Everything the builder writes.
#[derive(Debug, Clone)]
pub struct ReferenceSet {
    pub factions: Vec<FactionDocument>,
    pub index: Vec<FactionSummary>,
    pub core_stratagems: Vec<Stratagem>,
    pub last_update: Option<String>,
}

/// Join parsed source tables into reference documents.
///
/// Only non-virtual datasheets are kept. Factions with no datasheets are
/// left out of both the documents and the index.
pub fn build_reference(tables: &SourceTables) -> ReferenceSet {
    let join = DatasheetJoin::build(tables);
    let last_update = tables
        .rows(SourceTable::LastUpdate)
        .first()
        .map(|row| field(row, "lastUpdate").to_string())
        .filter(|s| !s.is_empty());

    let datasheet_rows = tables.rows(SourceTable::Datasheets);
    let mut factions = Vec::new();

    for faction in tables.rows(SourceTable::Factions) {
        let faction_id = field(faction, "id");

        let mut datasheets: Vec<_> = datasheet_rows
            .iter()
            .filter(|ds| field(ds, "factionId") == faction_id && field(ds, "virtual") == "false")
            .map(|ds| join.datasheet(ds))
            .collect();
        if datasheets.is_empty() {
            debug!("Skipping faction {} with no datasheets", faction_id);
            continue;
        }
        datasheets.sort_by(|a, b| compare_names(&a.name, &b.name));

        factions.push(FactionDocument {
            id: faction_id.to_string(),
            name: field(faction, "name").to_string(),
            last_update: last_update.clone(),
            detachments: build_detachments(tables, faction_id),
            datasheets,
        });
    }

    ReferenceSet {
        index: factions.iter().map(FactionSummary::from).collect(),
        factions,
        core_stratagems: core_stratagems(tables),
        last_update,
    }
}

/// Summary of a build run.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub factions_written: usize,
    pub datasheets_written: usize,
    pub core_stratagems: usize,
    pub tables_downloaded: usize,
    pub tables_from_cache: usize,
    pub last_update: Option<String>,
    pub finished_at: DateTime<Utc>,
    pub duration: Duration,
}

/// Runs the download, join and write steps.
pub struct ReferenceBuilder {
    fetcher: Fetcher,
    storage: StorageConfig,
    base_url: Url,
}

impl ReferenceBuilder {
    pub fn new(fetcher: Fetcher, storage: StorageConfig, base_url: Url) -> Self {
        Self {
            fetcher,
            storage,
            base_url,
        }
    }

    /// Download (or reuse cached) tables, build, and write every document.
    pub async fn run(&self, force: bool) -> Result<BuildReport, BuildError> {
        let started = Instant::now();

        let (tables, downloaded, cached) = self.load_tables(force).await?;
        for table in [SourceTable::Factions, SourceTable::Datasheets] {
            if tables.rows(table).is_empty() {
                return Err(BuildError::MissingTable(table.file_name()));
            }
        }

        let set = build_reference(&tables);
        self.write(&set).await?;

        let report = BuildReport {
            factions_written: set.factions.len(),
            datasheets_written: set.factions.iter().map(|f| f.datasheets.len()).sum(),
            core_stratagems: set.core_stratagems.len(),
            tables_downloaded: downloaded,
            tables_from_cache: cached,
            last_update: set.last_update.clone(),
            finished_at: Utc::now(),
            duration: started.elapsed(),
        };
        info!(
            "Reference build complete: {} factions, {} datasheets in {:?}",
            report.factions_written, report.datasheets_written, report.duration
        );
        Ok(report)
    }

    /// Fetch and parse every source table.
    pub async fn load_tables(&self, force: bool) -> Result<(SourceTables, usize, usize), BuildError> {
        let cache_dir = self.storage.cache_dir();
        let mut tables = SourceTables::new();
        let (mut downloaded, mut cached) = (0, 0);

        for table in SourceTable::ALL {
            let url = self
                .base_url
                .join(table.file_name())
                .map_err(|e| BuildError::InvalidUrl(e.to_string()))?;
            let cache_path = cache_dir.join(table.cache_name());

            let result = self.fetcher.fetch_cached(&url, &cache_path, force).await?;
            if result.from_cache {
                cached += 1;
                if let Some(meta) = Fetcher::read_metadata(&cache_path).await {
                    debug!("{} cached since {}", table.file_name(), meta.fetched_at);
                }
            } else {
                downloaded += 1;
            }

            let text = self.fetcher.read_cached_text(&result).await?;
            let rows = csv::parse_table(&text);
            info!("{:<45} {} rows", table.file_name(), rows.len());
            tables.insert(table, rows);
        }

        Ok((tables, downloaded, cached))
    }

    /// Write faction documents (compact), index and core stratagems (pretty).
    pub async fn write(&self, set: &ReferenceSet) -> Result<(), BuildError> {
        for faction in &set.factions {
            storage::write_json(&self.storage.faction_path(&faction.id), faction, false).await?;
            info!(
                "{:<40} {} units, {} detachments",
                faction.name,
                faction.datasheets.len(),
                faction.detachments.len()
            );
        }

        storage::write_json(&self.storage.index_path(), &set.index, true).await?;
        storage::write_json(&self.storage.core_stratagems_path(), &set.core_stratagems, true).await?;
        Ok(())
    }
}
