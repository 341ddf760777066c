use serde::{Deserialize, Serialize};

use super::space::{Label, Status};

/// A work item as returned by its source space. Labels still carry the
/// source space's ids; they are remapped by name before the item is moved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: String,
    #[serde(default)]
    pub labels: Vec<Label>,
    pub status: Status,
}

impl WorkItem {
    pub fn label_names(&self) -> Vec<&str> {
        self.labels.iter().map(|l| l.name.as_str()).collect()
    }

    /// Colour of the first label on this item carrying `name`.
    pub fn label_color(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|l| l.name == name)
            .map(|l| l.color.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemPage {
    pub work_items: Vec<WorkItem>,
    #[serde(default)]
    pub cursor: Option<String>,
    pub has_more: bool,
}
