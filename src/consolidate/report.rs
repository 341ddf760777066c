use std::fmt;

use thiserror::Error;

/// Where in the per-item sequence a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ResolveStatus,
    CreateLabel,
    Move,
    SetLabels,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::ResolveStatus => "resolve-status",
            Stage::CreateLabel => "create-label",
            Stage::Move => "move",
            Stage::SetLabels => "set-labels",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct ItemFailure {
    pub space: String,
    pub work_item_id: String,
    pub stage: Stage,
    pub error: String,
    /// The item's labels were replaced with destination ids despite the failure.
    pub labels_replaced: bool,
}

impl ItemFailure {
    /// Remote state the failure leaves the item in.
    pub fn note(&self) -> Option<&'static str> {
        match self.stage {
            Stage::Move if self.labels_replaced => {
                Some("not moved, but its labels were replaced with destination label ids")
            }
            Stage::Move => Some("not moved"),
            Stage::SetLabels => Some("moved, labels not set"),
            Stage::ResolveStatus | Stage::CreateLabel => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct ConsolidationReport {
    pub dry_run: bool,
    pub spaces: usize,
    pub items_fetched: usize,
    pub items_migrated: usize,
    pub labels_created: Vec<String>,
    pub failures: Vec<ItemFailure>,
}

impl ConsolidationReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn summary(&self) -> String {
        let verb = if self.dry_run { "Would move" } else { "Moved" };
        let label_verb = if self.dry_run { "would be created" } else { "created" };
        let mut out = format!(
            "{verb} {} of {} work items from {} spaces; {} labels {label_verb}",
            self.items_migrated,
            self.items_fetched,
            self.spaces,
            self.labels_created.len(),
        );
        if !self.labels_created.is_empty() {
            out.push_str(&format!(" ({})", self.labels_created.join(", ")));
        }
        for failure in &self.failures {
            out.push_str(&format!(
                "\n  failed {} in {} at {}: {}",
                failure.work_item_id, failure.space, failure.stage, failure.error
            ));
            if let Some(note) = failure.note() {
                out.push_str(&format!(" ({note})"));
            }
        }
        out
    }
}

/// A run that stopped at its first fatal error, with the work done before it.
#[derive(Debug, Error)]
#[error("{error:#}")]
pub struct Aborted {
    pub error: anyhow::Error,
    pub report: ConsolidationReport,
}
