use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Space {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub statuses: Vec<Status>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: String,
    pub name: String,
    /// Empty when the source label has no colour.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub color: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub status_type: StatusType,
    #[serde(default)]
    pub default: bool,
}

/// Workflow category of a status. Unknown categories are kept verbatim so two
/// distinct unknown types never collapse into one index slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StatusType {
    Backlog,
    Todo,
    InProgress,
    Done,
    Archived,
    Other(String),
}

impl StatusType {
    pub fn as_str(&self) -> &str {
        match self {
            StatusType::Backlog => "BACKLOG",
            StatusType::Todo => "TODO",
            StatusType::InProgress => "IN_PROGRESS",
            StatusType::Done => "DONE",
            StatusType::Archived => "ARCHIVED",
            StatusType::Other(s) => s,
        }
    }
}

impl From<String> for StatusType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "BACKLOG" => StatusType::Backlog,
            "TODO" => StatusType::Todo,
            "IN_PROGRESS" => StatusType::InProgress,
            "DONE" => StatusType::Done,
            "ARCHIVED" => StatusType::Archived,
            _ => StatusType::Other(s),
        }
    }
}

impl From<StatusType> for String {
    fn from(t: StatusType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for StatusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
