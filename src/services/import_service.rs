//! Bulk import of card records from an external JSON dump.
//!
//! Reference data (colors, editions) must be seeded before a run. Each run
//! builds its own [`ReferenceIndex`] up front and resolves every record
//! against it. A reference miss stops the run unless the options say to skip
//! such records; a record that fails to persist is rolled back and reported as
//! skipped while the run carries on.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::{ColorKey, ConflictPolicy, EditionKey, ImportOptions, MissingReferencePolicy};
use crate::database::entities::{cards, colors, editions};
use crate::errors::{ImportError, ImportResult};
use crate::services::card_service::{link_colors, unlink_colors};

/// One card as it appears in the import file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRecord {
    /// Becomes the card's primary key
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub flavor: Option<String>,
    #[serde(rename = "type", default)]
    pub card_type: Option<String>,
    #[serde(default)]
    pub power: Option<String>,
    #[serde(default)]
    pub toughness: Option<String>,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Edition reference, matched on the configured edition key
    pub set: String,
    /// Falls back to the edition's name
    #[serde(default)]
    pub set_name: Option<String>,
    /// Color references, matched on the configured color key
    #[serde(default)]
    pub colors: Vec<String>,
}

impl ImportRecord {
    fn to_active_model(&self, edition: &editions::Model) -> cards::ActiveModel {
        cards::ActiveModel {
            id: Set(self.id.clone()),
            name: Set(self.name.clone()),
            mana_cost: Set(self.mana_cost.clone()),
            text: Set(self.text.clone()),
            flavor: Set(self.flavor.clone()),
            card_type: Set(self.card_type.clone().unwrap_or_default()),
            power: Set(self.power.clone().unwrap_or_default()),
            toughness: Set(self.toughness.clone().unwrap_or_default()),
            rarity: Set(self.rarity.clone().unwrap_or_default()),
            set_name: Set(self
                .set_name
                .clone()
                .unwrap_or_else(|| edition.name.clone())),
            image_url: Set(self.image_url.clone().unwrap_or_default()),
            edition_id: Set(edition.id),
        }
    }
}

/// Colors and editions keyed the way import records refer to them. Built
/// once per run.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    colors: HashMap<String, colors::Model>,
    editions: HashMap<String, editions::Model>,
}

impl ReferenceIndex {
    pub async fn load<C: ConnectionTrait>(db: &C, options: &ImportOptions) -> Result<Self, DbErr> {
        let colors = colors::Entity::find()
            .order_by_asc(colors::Column::Id)
            .all(db)
            .await?;
        let editions = editions::Entity::find()
            .order_by_asc(editions::Column::Id)
            .all(db)
            .await?;

        Ok(Self::build(colors, editions, options))
    }

    /// Later rows win when two share a key.
    pub fn build(
        colors: Vec<colors::Model>,
        editions: Vec<editions::Model>,
        options: &ImportOptions,
    ) -> Self {
        let colors = colors
            .into_iter()
            .map(|color| {
                let key = match options.color_key {
                    ColorKey::Name => color.name.clone(),
                    ColorKey::Code => color.code.code().to_string(),
                };
                (key, color)
            })
            .collect();

        let editions = editions
            .into_iter()
            .map(|edition| {
                let key = match options.edition_key {
                    EditionKey::Code => edition.code.clone(),
                    EditionKey::Name => edition.name.clone(),
                };
                (key, edition)
            })
            .collect();

        Self { colors, editions }
    }

    pub fn color(&self, reference: &str) -> Option<&colors::Model> {
        self.colors.get(reference)
    }

    pub fn edition(&self, reference: &str) -> Option<&editions::Model> {
        self.editions.get(reference)
    }

    pub fn color_count(&self) -> usize {
        self.colors.len()
    }

    pub fn edition_count(&self) -> usize {
        self.editions.len()
    }
}

/// What happened to a single input record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordOutcome {
    Imported { id: String, colors: usize },
    Skipped { id: String, reason: String },
}

impl RecordOutcome {
    pub fn id(&self) -> &str {
        match self {
            RecordOutcome::Imported { id, .. } | RecordOutcome::Skipped { id, .. } => id,
        }
    }

    pub fn is_imported(&self) -> bool {
        matches!(self, RecordOutcome::Imported { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
    pub outcomes: Vec<RecordOutcome>,
}

impl ImportReport {
    fn push(&mut self, outcome: RecordOutcome) {
        if outcome.is_imported() {
            self.imported += 1;
        } else {
            self.skipped += 1;
        }
        self.outcomes.push(outcome);
    }

    pub fn skipped_ids(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|outcome| !outcome.is_imported())
            .map(RecordOutcome::id)
            .collect()
    }
}

pub struct ImportService {
    db: DatabaseConnection,
    options: ImportOptions,
}

impl ImportService {
    pub fn new(db: DatabaseConnection, options: ImportOptions) -> Self {
        Self { db, options }
    }

    pub fn parse_records(content: &str) -> ImportResult<Vec<ImportRecord>> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read a JSON array of card records from `path` and import it.
    pub async fn import_file(&self, path: &Path) -> ImportResult<ImportReport> {
        info!("Reading card records from {}", path.display());
        let content = tokio::fs::read_to_string(path).await?;
        let records = Self::parse_records(&content)?;
        self.import_records(&records).await
    }

    /// Import records in input order.
    ///
    /// Under the abort policy the first unknown edition or color ends the run
    /// with an error: earlier records stay imported, later ones are never
    /// touched.
    pub async fn import_records(&self, records: &[ImportRecord]) -> ImportResult<ImportReport> {
        let mut report = ImportReport::default();
        self.import_into(records, &mut report).await?;
        Ok(report)
    }

    /// Like [`ImportService::import_records`], but outcomes land in `report`
    /// as they happen, so a run that stops early still shows what it did.
    pub async fn import_into(
        &self,
        records: &[ImportRecord],
        report: &mut ImportReport,
    ) -> ImportResult<()> {
        let index = ReferenceIndex::load(&self.db, &self.options).await?;
        info!(
            "Importing {} card records against {} colors and {} editions",
            records.len(),
            index.color_count(),
            index.edition_count()
        );

        for (position, record) in records.iter().enumerate() {
            let outcome = self.import_record(&index, position, record).await?;
            report.push(outcome);
        }

        info!(
            "Import finished: {} imported, {} skipped",
            report.imported, report.skipped
        );
        Ok(())
    }

    async fn import_record(
        &self,
        index: &ReferenceIndex,
        position: usize,
        record: &ImportRecord,
    ) -> ImportResult<RecordOutcome> {
        let Some(edition) = index.edition(&record.set) else {
            return self.missing_reference(ImportError::UnknownEdition {
                index: position,
                id: record.id.clone(),
                reference: record.set.clone(),
            });
        };

        let mut color_ids: Vec<i32> = Vec::with_capacity(record.colors.len());
        for reference in &record.colors {
            match index.color(reference) {
                Some(color) if !color_ids.contains(&color.id) => color_ids.push(color.id),
                Some(_) => {}
                None => {
                    return self.missing_reference(ImportError::UnknownColor {
                        index: position,
                        id: record.id.clone(),
                        reference: reference.clone(),
                    });
                }
            }
        }

        match self.persist(record, edition, &color_ids).await {
            Ok(()) => {
                debug!("Imported card {} ({})", record.id, record.name);
                Ok(RecordOutcome::Imported {
                    id: record.id.clone(),
                    colors: color_ids.len(),
                })
            }
            Err(err) => {
                warn!("Skipping card {}: {}", record.id, err);
                Ok(RecordOutcome::Skipped {
                    id: record.id.clone(),
                    reason: err.to_string(),
                })
            }
        }
    }

    fn missing_reference(&self, err: ImportError) -> ImportResult<RecordOutcome> {
        match self.options.missing_reference {
            MissingReferencePolicy::Abort => Err(err),
            MissingReferencePolicy::Skip => {
                let id = match &err {
                    ImportError::UnknownEdition { id, .. } | ImportError::UnknownColor { id, .. } => {
                        id.clone()
                    }
                    _ => String::new(),
                };
                warn!("Skipping card {}: {}", id, err);
                Ok(RecordOutcome::Skipped {
                    id,
                    reason: err.to_string(),
                })
            }
        }
    }

    /// Write one card and its color links atomically.
    async fn persist(
        &self,
        record: &ImportRecord,
        edition: &editions::Model,
        color_ids: &[i32],
    ) -> Result<(), DbErr> {
        let txn = self.db.begin().await?;
        let card = record.to_active_model(edition);

        match self.options.conflict_policy {
            ConflictPolicy::Replace => {
                cards::Entity::insert(card)
                    .on_conflict(
                        OnConflict::column(cards::Column::Id)
                            .update_columns([
                                cards::Column::Name,
                                cards::Column::ManaCost,
                                cards::Column::Text,
                                cards::Column::Flavor,
                                cards::Column::CardType,
                                cards::Column::Power,
                                cards::Column::Toughness,
                                cards::Column::Rarity,
                                cards::Column::SetName,
                                cards::Column::ImageUrl,
                                cards::Column::EditionId,
                            ])
                            .to_owned(),
                    )
                    .exec_without_returning(&txn)
                    .await?;
                unlink_colors(&txn, &record.id).await?;
            }
            ConflictPolicy::Reject => {
                cards::Entity::insert(card)
                    .exec_without_returning(&txn)
                    .await?;
            }
        }

        link_colors(&txn, &record.id, color_ids).await?;
        txn.commit().await
    }
}
