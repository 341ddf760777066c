use std::collections::HashMap;

use crate::model::space::{Label, Status, StatusType};

/// Destination label ids keyed by label name.
#[derive(Debug, Default, Clone)]
pub struct LabelIndex {
    ids: HashMap<String, String>,
}

impl LabelIndex {
    /// Later labels with a duplicate name overwrite earlier ones.
    pub fn from_labels(labels: &[Label]) -> Self {
        let ids = labels
            .iter()
            .map(|l| (l.name.clone(), l.id.clone()))
            .collect();
        Self { ids }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.ids.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ids.contains_key(name)
    }

    pub fn insert(&mut self, name: &str, id: String) {
        self.ids.insert(name.to_string(), id);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

/// One destination status id per status type.
#[derive(Debug, Default, Clone)]
pub struct StatusIndex {
    ids: HashMap<StatusType, String>,
}

impl StatusIndex {
    /// First status of a type wins unless a later one of that type is the
    /// default. BACKLOG falls back to TODO when the destination has no backlog.
    pub fn from_statuses(statuses: &[Status]) -> Self {
        let mut ids: HashMap<StatusType, String> = HashMap::new();
        for status in statuses {
            if status.default || !ids.contains_key(&status.status_type) {
                ids.insert(status.status_type.clone(), status.id.clone());
            }
        }

        if !ids.contains_key(&StatusType::Backlog) {
            if let Some(todo) = ids.get(&StatusType::Todo).cloned() {
                ids.insert(StatusType::Backlog, todo);
            }
        }

        Self { ids }
    }

    pub fn get(&self, status_type: &StatusType) -> Option<&str> {
        self.ids.get(status_type).map(String::as_str)
    }
}
