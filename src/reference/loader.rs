//! Loading and caching reference documents for a roster.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::matcher::{lookup_detachment, resolve_faction, NameIndex};
use super::store::ReferenceStore;
use super::ReferenceError;
use crate::models::{Datasheet, Detachment, FactionDocument, FactionSummary};

/// A faction document together with its name index.
#[derive(Debug, Clone)]
pub struct FactionReference {
    pub document: FactionDocument,
    names: NameIndex,
}

impl FactionReference {
    pub fn new(document: FactionDocument) -> Self {
        let names = NameIndex::build(&document);
        Self { document, names }
    }

    pub fn id(&self) -> &str {
        &self.document.id
    }

    /// Datasheet for a roster unit name, by exact normalized name.
    pub fn unit(&self, unit_name: &str) -> Option<&Datasheet> {
        self.names.lookup_unit(&self.document, unit_name)
    }

    /// Detachment for a roster detachment name (exact, then partial).
    pub fn detachment(&self, detachment_name: &str) -> Option<&Detachment> {
        lookup_detachment(&self.document, detachment_name)
    }

    pub fn datasheet_by_id(&self, id: &str) -> Option<&Datasheet> {
        self.document.datasheets.iter().find(|d| d.id == id)
    }

    /// Whether `leader` may be attached to `target`, per the leader tables.
    pub fn can_lead(&self, leader: &Datasheet, target: &Datasheet) -> bool {
        leader.can_lead.iter().any(|id| *id == target.id)
            || target.led_by.iter().any(|id| *id == leader.id)
    }
}

/// Resolves roster catalogues to faction documents, caching each faction
/// for the lifetime of the loader.
pub struct ReferenceLoader {
    store: Arc<dyn ReferenceStore>,
    factions: RwLock<HashMap<String, Arc<FactionReference>>>,
}

impl ReferenceLoader {
    pub fn new(store: Arc<dyn ReferenceStore>) -> Self {
        Self {
            store,
            factions: RwLock::new(HashMap::new()),
        }
    }

    /// Reference data for a roster catalogue, or `None` when there is no
    /// matching faction or anything goes wrong fetching it.
    pub async fn load_for_catalogue(&self, catalogue_name: &str) -> Option<Arc<FactionReference>> {
        match self.try_load_for_catalogue(catalogue_name).await {
            Ok(Some(reference)) => Some(reference),
            Ok(None) => {
                info!("No reference faction matches '{}'", catalogue_name);
                None
            }
            Err(e) => {
                warn!(
                    "Reference data unavailable for '{}' ({} store): {}",
                    catalogue_name,
                    self.store.name(),
                    e
                );
                None
            }
        }
    }

    /// Fallible variant of [`Self::load_for_catalogue`].
    pub async fn try_load_for_catalogue(
        &self,
        catalogue_name: &str,
    ) -> Result<Option<Arc<FactionReference>>, ReferenceError> {
        let index = self.store.index().await?;
        let Some(summary) = resolve_faction(catalogue_name, &index) else {
            return Ok(None);
        };
        debug!(
            "Catalogue '{}' resolved to faction {} ({})",
            catalogue_name, summary.name, summary.id
        );

        self.load_faction(summary).await.map(Some)
    }

    /// Fetch a faction document, serving repeated requests from the cache.
    pub async fn load_faction(
        &self,
        summary: &FactionSummary,
    ) -> Result<Arc<FactionReference>, ReferenceError> {
        if let Some(cached) = self.factions.read().await.get(&summary.id) {
            debug!("Serving faction {} from cache", summary.id);
            return Ok(Arc::clone(cached));
        }

        let document = self.store.faction(&summary.id).await?;
        let reference = Arc::new(FactionReference::new(document));
        info!(
            "Loaded faction {} ({} datasheets, {} detachments)",
            reference.document.name,
            reference.document.datasheets.len(),
            reference.document.detachments.len()
        );

        self.factions
            .write()
            .await
            .insert(summary.id.clone(), Arc::clone(&reference));
        Ok(reference)
    }

    /// Number of faction documents held in the cache.
    pub async fn cached_count(&self) -> usize {
        self.factions.read().await.len()
    }
}
