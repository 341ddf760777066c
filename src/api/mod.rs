pub mod graphql;

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::config::Settings;
use crate::model::space::Space;
use crate::model::work_item::WorkItemPage;

/// The remote operations the consolidation engine consumes.
#[async_trait]
pub trait KitemakerApi: Send + Sync {
    /// Every space in the organization with its labels and statuses.
    async fn list_spaces(&self) -> Result<Vec<Space>>;

    async fn list_work_items(
        &self,
        space_id: &str,
        cursor: Option<&str>,
        count: usize,
    ) -> Result<WorkItemPage>;

    /// Create a label in `space_id` and return its id.
    async fn create_label(&self, space_id: &str, name: &str, color: &str) -> Result<String>;

    async fn move_work_item(&self, work_item_id: &str, space_id: &str, status_id: &str)
        -> Result<()>;

    /// Replace the item's labels with exactly `label_ids`.
    async fn set_labels(&self, work_item_id: &str, label_ids: &[String]) -> Result<()>;
}

pub fn create_client(settings: &Settings) -> Box<dyn KitemakerApi> {
    let client = graphql::GraphQlClient::new(&settings.host, settings.token.clone());
    debug!(endpoint = client.endpoint(), "created Kitemaker client");
    Box::new(client)
}

#[cfg(test)]
pub mod fake;
