pub mod fetch;
pub mod report;
pub mod vocab;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::api::KitemakerApi;
use crate::error::ConsolidateError;
use crate::journal::{new_entry, Journal, JournalEntry, FAILED, LABEL_CREATED, MIGRATED};
use crate::model::space::Space;
use crate::model::work_item::WorkItem;
use fetch::fetch_all_items;
use report::{Aborted, ConsolidationReport, ItemFailure, Stage};
use vocab::{LabelIndex, StatusIndex};

#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub page_size: usize,
    /// Record per-item failures and continue instead of aborting the run.
    pub keep_going: bool,
    /// Resolve everything but issue no mutations.
    pub dry_run: bool,
}

struct ItemError {
    stage: Stage,
    error: anyhow::Error,
    labels_replaced: bool,
}

impl ItemError {
    fn new(stage: Stage, error: impl Into<anyhow::Error>) -> Self {
        Self {
            stage,
            error: error.into(),
            labels_replaced: false,
        }
    }

    /// The relabel went through even though this stage failed.
    fn with_labels_replaced(mut self) -> Self {
        self.labels_replaced = true;
        self
    }
}

/// Moves every work item of the source spaces into one destination space.
///
/// The label and status indexes are built once from the destination and
/// then grow as labels are created, so a label missing from the destination
/// is created at most once per run.
pub struct Consolidator<'a> {
    api: &'a dyn KitemakerApi,
    destination: &'a Space,
    labels: LabelIndex,
    statuses: StatusIndex,
    options: Options,
    journal: Option<&'a Journal>,
    report: ConsolidationReport,
}

impl<'a> Consolidator<'a> {
    pub fn new(api: &'a dyn KitemakerApi, destination: &'a Space, options: Options) -> Self {
        let labels = LabelIndex::from_labels(&destination.labels);
        let statuses = StatusIndex::from_statuses(&destination.statuses);
        debug!(
            destination = %destination.name,
            labels = labels.len(),
            "built destination vocabulary"
        );

        Self {
            api,
            destination,
            labels,
            statuses,
            options,
            journal: None,
            report: ConsolidationReport {
                dry_run: options.dry_run,
                ..Default::default()
            },
        }
    }

    pub fn with_journal(mut self, journal: &'a Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Consolidate every space in `spaces` except the destination, in order.
    ///
    /// A run that stops early still hands back what it did before the error.
    pub async fn run(mut self, spaces: &[Space]) -> Result<ConsolidationReport, Aborted> {
        let destination = self.destination;
        for space in spaces.iter().filter(|s| s.id != destination.id) {
            if let Err(error) = self.consolidate_space(space).await {
                return Err(Aborted {
                    error,
                    report: self.report,
                });
            }
        }
        Ok(self.report)
    }

    async fn consolidate_space(&mut self, space: &Space) -> Result<()> {
        let items = fetch_all_items(self.api, &space.id, self.options.page_size)
            .await
            .with_context(|| format!("Unable to fetch work items for space {}", space.name))?;

        info!(space = %space.name, items = items.len(), "consolidating space");
        self.report.spaces += 1;
        self.report.items_fetched += items.len();

        for item in &items {
            match self.consolidate_item(item).await {
                Ok(()) => {
                    self.report.items_migrated += 1;
                    self.record(new_entry(
                        MIGRATED,
                        Some(&space.name),
                        Some(&item.id),
                        None,
                        None,
                    ));
                }
                Err(ItemError {
                    stage,
                    error,
                    labels_replaced,
                }) => {
                    let message = format!("{error:#}");
                    self.record(new_entry(
                        FAILED,
                        Some(&space.name),
                        Some(&item.id),
                        None,
                        Some(&format!("{stage}: {message}")),
                    ));

                    if !self.options.keep_going {
                        return Err(error.context(format!(
                            "{stage} failed for work item {} in space {}",
                            item.id, space.name
                        )));
                    }

                    warn!(
                        space = %space.name,
                        work_item = %item.id,
                        %stage,
                        error = %message,
                        "work item failed, continuing"
                    );
                    self.report.failures.push(ItemFailure {
                        space: space.name.clone(),
                        work_item_id: item.id.clone(),
                        stage,
                        error: message,
                        labels_replaced,
                    });
                }
            }
        }

        Ok(())
    }

    async fn consolidate_item(&mut self, item: &WorkItem) -> Result<(), ItemError> {
        // Resolved up front so an unmappable item triggers no mutations at all.
        let status_id = self
            .statuses
            .get(&item.status.status_type)
            .map(String::from)
            .ok_or_else(|| {
                ItemError::new(
                    Stage::ResolveStatus,
                    ConsolidateError::NoMatchingStatus(item.status.status_type.clone()),
                )
            })?;

        let label_names = item.label_names();
        for name in &label_names {
            if !self.labels.contains(name) {
                let color = item.label_color(name).unwrap_or_default();
                self.create_label(name, color)
                    .await
                    .map_err(|e| ItemError::new(Stage::CreateLabel, e))?;
            }
        }

        let label_ids = label_names
            .iter()
            .map(|name| {
                self.labels
                    .get(name)
                    .map(String::from)
                    .ok_or_else(|| ConsolidateError::UnresolvedLabel(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ItemError::new(Stage::CreateLabel, e))?;

        debug!(
            work_item = %item.id,
            status = %status_id,
            labels = ?label_ids,
            dry_run = self.options.dry_run,
            "moving work item"
        );
        if self.options.dry_run {
            return Ok(());
        }

        // Both mutations are always issued; the first failure is reported.
        let moved = self
            .api
            .move_work_item(&item.id, &self.destination.id, &status_id)
            .await;
        let relabeled = self.api.set_labels(&item.id, &label_ids).await;

        match (moved, relabeled) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(e), Ok(())) => Err(ItemError::new(Stage::Move, e).with_labels_replaced()),
            (Err(e), Err(relabel)) => Err(ItemError::new(
                Stage::Move,
                anyhow::anyhow!("{e:#}; labels were not set either: {relabel:#}"),
            )),
            (Ok(()), Err(e)) => Err(ItemError::new(Stage::SetLabels, e)),
        }
    }

    async fn create_label(&mut self, name: &str, color: &str) -> Result<()> {
        let id = if self.options.dry_run {
            format!("dry-run:{name}")
        } else {
            self.api
                .create_label(&self.destination.id, name, color)
                .await?
        };

        if self.options.dry_run {
            info!(label = name, color, "would create destination label");
        } else {
            info!(label = name, color, id = %id, "created destination label");
        }
        self.labels.insert(name, id);
        self.report.labels_created.push(name.to_string());
        self.record(new_entry(LABEL_CREATED, None, None, Some(name), Some(color)));
        Ok(())
    }

    fn record(&self, entry: JournalEntry) {
        if let Some(journal) = self.journal {
            if let Err(e) = journal.append(&entry) {
                warn!(
                    error = %e,
                    path = %journal.path().display(),
                    "failed to write journal entry"
                );
            }
        }
    }
}
