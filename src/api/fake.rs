//! In-memory `KitemakerApi` that serves canned spaces and work items and
//! records every call in order.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;

use super::KitemakerApi;
use crate::model::space::{Label, Space, Status, StatusType};
use crate::model::work_item::{WorkItem, WorkItemPage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListSpaces,
    ListWorkItems {
        space_id: String,
        cursor: Option<String>,
        count: usize,
    },
    CreateLabel {
        space_id: String,
        name: String,
        color: String,
    },
    Move {
        work_item_id: String,
        space_id: String,
        status_id: String,
    },
    SetLabels {
        work_item_id: String,
        label_ids: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    ListWorkItems,
    CreateLabel,
    Move,
    SetLabels,
}

#[derive(Default)]
pub struct FakeApi {
    spaces: Vec<Space>,
    items: HashMap<String, Vec<WorkItem>>,
    pages: HashMap<String, Vec<WorkItemPage>>,
    created_ids: HashMap<String, String>,
    failures: HashSet<(Op, String)>,
    pub calls: Arc<Mutex<Vec<Call>>>,
}

impl FakeApi {
    pub fn new(spaces: Vec<Space>) -> Self {
        Self {
            spaces,
            ..Self::default()
        }
    }

    pub fn with_items(mut self, space_id: &str, items: Vec<WorkItem>) -> Self {
        self.items.insert(space_id.to_string(), items);
        self
    }

    /// Serve `pages` verbatim, one per request and in order, ignoring the
    /// cursor. Takes precedence over `with_items` for the same space.
    pub fn with_pages(mut self, space_id: &str, pages: Vec<WorkItemPage>) -> Self {
        self.pages.insert(space_id.to_string(), pages);
        self
    }

    /// Id returned when a label called `name` is created. Defaults to `new-<name>`.
    pub fn with_created_id(mut self, name: &str, id: &str) -> Self {
        self.created_ids.insert(name.to_string(), id.to_string());
        self
    }

    /// Fail `op` whenever its key (space id, item id, or label name) matches.
    pub fn with_failure(mut self, op: Op, key: &str) -> Self {
        self.failures.insert((op, key.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, op: Op, key: &str) -> Result<()> {
        if self.failures.contains(&(op, key.to_string())) {
            bail!("Mock failure: {op:?} {key}");
        }
        Ok(())
    }
}

#[async_trait]
impl KitemakerApi for FakeApi {
    async fn list_spaces(&self) -> Result<Vec<Space>> {
        self.record(Call::ListSpaces);
        Ok(self.spaces.clone())
    }

    async fn list_work_items(
        &self,
        space_id: &str,
        cursor: Option<&str>,
        count: usize,
    ) -> Result<WorkItemPage> {
        self.record(Call::ListWorkItems {
            space_id: space_id.to_string(),
            cursor: cursor.map(String::from),
            count,
        });
        self.check(Op::ListWorkItems, space_id)?;

        if let Some(pages) = self.pages.get(space_id) {
            let served = self.count(|c| {
                matches!(c, Call::ListWorkItems { space_id: s, .. } if s == space_id)
            });
            match pages.get(served - 1) {
                Some(page) => return Ok(page.clone()),
                None => bail!("No scripted page {served} for space {space_id}"),
            }
        }

        let all = self.items.get(space_id).cloned().unwrap_or_default();
        let start = cursor.and_then(|c| c.parse::<usize>().ok()).unwrap_or(0);
        let end = (start + count).min(all.len());
        let work_items = all.get(start..end).map(<[WorkItem]>::to_vec).unwrap_or_default();

        Ok(WorkItemPage {
            work_items,
            cursor: Some(end.to_string()),
            has_more: end < all.len(),
        })
    }

    async fn create_label(&self, space_id: &str, name: &str, color: &str) -> Result<String> {
        self.record(Call::CreateLabel {
            space_id: space_id.to_string(),
            name: name.to_string(),
            color: color.to_string(),
        });
        self.check(Op::CreateLabel, name)?;
        Ok(self
            .created_ids
            .get(name)
            .cloned()
            .unwrap_or_else(|| format!("new-{name}")))
    }

    async fn move_work_item(
        &self,
        work_item_id: &str,
        space_id: &str,
        status_id: &str,
    ) -> Result<()> {
        self.record(Call::Move {
            work_item_id: work_item_id.to_string(),
            space_id: space_id.to_string(),
            status_id: status_id.to_string(),
        });
        self.check(Op::Move, work_item_id)
    }

    async fn set_labels(&self, work_item_id: &str, label_ids: &[String]) -> Result<()> {
        self.record(Call::SetLabels {
            work_item_id: work_item_id.to_string(),
            label_ids: label_ids.to_vec(),
        });
        self.check(Op::SetLabels, work_item_id)
    }
}

pub fn label(id: &str, name: &str, color: &str) -> Label {
    Label {
        id: id.to_string(),
        name: name.to_string(),
        color: color.to_string(),
    }
}

pub fn status(id: &str, status_type: StatusType, default: bool) -> Status {
    Status {
        id: id.to_string(),
        name: status_type.to_string(),
        status_type,
        default,
    }
}

pub fn space(id: &str, labels: Vec<Label>, statuses: Vec<Status>) -> Space {
    Space {
        id: id.to_string(),
        name: format!("Space {id}"),
        labels,
        statuses,
    }
}

pub fn item(id: &str, labels: Vec<Label>, status_type: StatusType) -> WorkItem {
    WorkItem {
        id: id.to_string(),
        labels,
        status: status(&format!("src-{id}"), status_type, false),
    }
}

pub fn numbered_items(n: usize) -> Vec<WorkItem> {
    (0..n)
        .map(|i| item(&format!("wi{i}"), vec![], StatusType::Todo))
        .collect()
}
