//! The entity normalization pipeline
//!
//! Orchestrates fetch → claim filtering → value rendering → label
//! resolution → output assembly for the two projections: an RDF-style
//! triple document and a dual table (URI table + labels table).

use crate::error::{ApiError, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument};
use wikigraph_core::{
    filter_claims, is_entity_ref_datatype, join_rendered, join_strings, render, ClaimMap,
    EntityRecord, Table, TripleSet,
};
use wikigraph_labels::{BanLedger, LabelResolver};

/// Remote entity-fetch contract (the knowledge base's entity endpoint).
#[async_trait]
pub trait EntityFetch: Send + Sync {
    async fn fetch_entity(&self, id: &str) -> Result<EntityRecord>;
}

/// The dual-table projection of an entity.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TableOutput {
    pub labels_table: Table,
    pub uri_table: Table,
}

/// Entity normalization service. One instance per process; the label
/// store and ban ledger inside it are the process-wide shared state.
pub struct EntityApi {
    fetcher: Arc<dyn EntityFetch>,
    resolver: LabelResolver,
    ledger: Mutex<BanLedger>,
    entity_prefix: String,
    banned_datatypes: Vec<String>,
}

impl EntityApi {
    pub fn new(
        fetcher: Arc<dyn EntityFetch>,
        resolver: LabelResolver,
        ledger: BanLedger,
        entity_prefix: impl Into<String>,
        banned_datatypes: Vec<String>,
    ) -> Self {
        Self {
            fetcher,
            resolver,
            ledger: Mutex::new(ledger),
            entity_prefix: entity_prefix.into(),
            banned_datatypes,
        }
    }

    /// Project an entity as an N-Triples-style document.
    #[instrument(skip(self))]
    pub async fn produce_triples(&self, entity_id: &str) -> Result<String> {
        let record = self.fetcher.fetch_entity(entity_id).await?;
        let label = required_label(&record)?.to_string();
        let description = record.display_description().to_string();
        let aliases = join_strings(&record.display_aliases());

        let filtered = self.admissible_claims(&record).await;

        // Referenced entity identifiers, bare form, for label resolution.
        let mut entity_ids = Vec::new();
        for (_, claims) in &filtered {
            let datatype = &claims[0].mainsnak.datatype;
            if is_entity_ref_datatype(datatype) {
                for claim in claims {
                    if let Some(v) = render(&claim.mainsnak, true, &self.entity_prefix)? {
                        entity_ids.push(self.strip_prefix(&v));
                    }
                }
            }
        }
        let property_ids: Vec<&str> = filtered.iter().map(|(p, _)| p.as_str()).collect();
        let ids: Vec<&str> = entity_ids
            .iter()
            .map(String::as_str)
            .chain(property_ids)
            .collect();
        let labels = self.resolver.resolve_many(ids).await?;

        let subject = format!("urn:{label}");
        let mut triples = TripleSet::new();
        triples.push(&subject, "urn:description", description);
        triples.push(&subject, "urn:aliases", aliases);

        for (property, claims) in &filtered {
            let mut values: Vec<Option<String>> = Vec::with_capacity(claims.len());
            for claim in claims {
                let bare = render(&claim.mainsnak, false, &self.entity_prefix)?;
                let resolved = bare.as_ref().and_then(|b| labels.get(b)).cloned();
                // Fall back to the prefixed rendering when no label is known.
                let value = match resolved {
                    Some(label) => Some(label),
                    None => render(&claim.mainsnak, true, &self.entity_prefix)?,
                };
                values.push(value);
            }
            let property_label = labels
                .get(property)
                .cloned()
                .unwrap_or_else(|| property.clone());

            // Label-based secondary filter, independent of the datatype
            // filter applied earlier.
            let admitted = self
                .ledger
                .lock()
                .await
                .check_label(&property_label, property);
            if admitted {
                triples.push(
                    &subject,
                    format!("urn:{property_label}"),
                    join_rendered(&values),
                );
            }
        }

        debug!(entity = entity_id, triples = triples.len(), "triples produced");
        Ok(triples.to_document())
    }

    /// Project an entity as a URI table plus a labels table.
    #[instrument(skip(self))]
    pub async fn produce_table(&self, entity_id: &str) -> Result<TableOutput> {
        let record = self.fetcher.fetch_entity(entity_id).await?;
        let label = required_label(&record)?.to_string();

        let mut uri_table = self.base_table(&record, &label);
        let mut labels_table = uri_table.clone();

        let filtered = self.admissible_claims(&record).await;

        // Fill the URI table and collect referenced entity identifiers,
        // deduplicated in first-seen order.
        let mut entity_ids: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for (property, claims) in &filtered {
            let datatype = &claims[0].mainsnak.datatype;
            let mut rendered = Vec::with_capacity(claims.len());
            for claim in claims {
                // Unrenderable values are dropped from table columns.
                if let Some(v) = render(&claim.mainsnak, true, &self.entity_prefix)? {
                    rendered.push(v);
                }
            }
            if is_entity_ref_datatype(datatype) {
                for v in &rendered {
                    let bare = self.strip_prefix(v);
                    if seen.insert(bare.clone()) {
                        entity_ids.push(bare);
                    }
                }
            }
            uri_table.insert(property.clone(), rendered);
        }

        let property_ids: Vec<&str> = filtered.iter().map(|(p, _)| p.as_str()).collect();
        let ids: Vec<&str> = entity_ids
            .iter()
            .map(String::as_str)
            .chain(property_ids)
            .collect();
        let labels = self.resolver.resolve_many(ids).await?;

        // Substitute labels column by column; a property whose resolved
        // label fails the denylist loses its entire URI-table column.
        let mut discarded: Vec<String> = Vec::new();
        let property_columns: Vec<(String, Vec<String>)> = uri_table
            .iter()
            .filter(|(column, _)| !labels_table.contains_column(column))
            .map(|(column, cells)| (column.to_string(), cells.to_vec()))
            .collect();

        for (column, cells) in property_columns {
            let substituted: Vec<String> = cells
                .iter()
                .map(|cell| {
                    labels
                        .get(&self.strip_prefix(cell))
                        .cloned()
                        .unwrap_or_else(|| cell.clone())
                })
                .collect();
            let property_label = labels
                .get(&column)
                .cloned()
                .unwrap_or_else(|| column.clone());

            let admitted = self.ledger.lock().await.check_label(&property_label, &column);
            if admitted {
                labels_table.insert(property_label, vec![join_strings(&substituted)]);
                uri_table.insert(column, vec![join_strings(&cells)]);
            } else {
                discarded.push(column);
            }
        }
        for column in discarded {
            uri_table.remove(&column);
        }

        debug!(
            entity = entity_id,
            columns = uri_table.len(),
            "table produced"
        );
        Ok(TableOutput {
            labels_table,
            uri_table,
        })
    }

    /// (cached labels, no-label entries) counts
    pub async fn cache_sizes(&self) -> (usize, usize) {
        self.resolver.cache_sizes().await
    }

    /// Number of banned properties in the ledger
    pub async fn banned_count(&self) -> usize {
        self.ledger.lock().await.len()
    }

    async fn admissible_claims(&self, record: &EntityRecord) -> ClaimMap {
        let banned = self.ledger.lock().await.banned_snapshot();
        filter_claims(&record.claims, &banned, &self.banned_datatypes)
    }

    fn base_table(&self, record: &EntityRecord, label: &str) -> Table {
        let mut table = Table::new();
        table.insert(
            "URI",
            vec![format!("{}{}", self.entity_prefix, record.id)],
        );
        table.insert("label", vec![label.to_string()]);
        table.insert(
            "description",
            vec![record.display_description().to_string()],
        );
        table.insert("aliases", vec![join_strings(&record.display_aliases())]);
        table
    }

    fn strip_prefix(&self, value: &str) -> String {
        value.replace(&self.entity_prefix, "")
    }
}

fn required_label(record: &EntityRecord) -> Result<&str> {
    record
        .display_label()
        .ok_or_else(|| ApiError::bad_input("provided entity has no English label"))
}
