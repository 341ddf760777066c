use anyhow::Result;
use async_trait::async_trait;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::KitemakerApi;
use crate::error::ApiError;
use crate::model::space::Space;
use crate::model::work_item::WorkItemPage;

pub struct GraphQlClient {
    endpoint: String,
    token: String,
    client: reqwest::Client,
}

impl GraphQlClient {
    pub fn new(host: &str, token: String) -> Self {
        Self {
            endpoint: format!("{}/developers/graphql", host.trim_end_matches('/')),
            token,
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        query: &'static str,
        variables: serde_json::Value,
    ) -> Result<T, ApiError> {
        debug!(operation, "sending GraphQL request");

        let request = Request { query, variables };
        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|source| ApiError::Transport { operation, source })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                operation,
                status,
                body,
            });
        }

        let gql: GqlResponse<T> = resp
            .json()
            .await
            .map_err(|source| ApiError::Decode { operation, source })?;

        if let Some(errors) = gql.errors.filter(|e| !e.is_empty()) {
            return Err(ApiError::GraphQl {
                operation,
                messages: errors.into_iter().map(|e| e.message).collect(),
            });
        }

        gql.data.ok_or(ApiError::MissingData { operation })
    }
}

const SPACES_QUERY: &str = r#"
query Spaces {
  organization {
    spaces {
      id
      name
      labels { id name color }
      statuses { id name type default }
    }
  }
}"#;

const WORK_ITEMS_QUERY: &str = r#"
query WorkItems($space: ID!, $cursor: String, $count: Int!) {
  workItems(spaceId: $space, cursor: $cursor, count: $count) {
    workItems {
      id
      labels { id name color }
      status { id name type default }
    }
    cursor
    hasMore
  }
}"#;

const CREATE_LABEL_MUTATION: &str = r#"
mutation CreateLabel($space: ID!, $name: String!, $color: String!) {
  createLabel(input: { spaceId: $space, name: $name, color: $color }) {
    label { id }
  }
}"#;

const MOVE_WORK_ITEM_MUTATION: &str = r#"
mutation MoveWorkItem($id: ID!, $space: ID!, $status: ID!) {
  moveWorkItem(input: { id: $id, spaceId: $space, statusId: $status }) {
    workItem { id }
  }
}"#;

const SET_LABELS_MUTATION: &str = r#"
mutation SetLabels($id: ID!, $labels: [ID!]!) {
  editWorkItem(input: { id: $id, labelIds: $labels }) {
    workItem { id labels { id } }
  }
}"#;

#[derive(Serialize)]
struct Request {
    query: &'static str,
    variables: serde_json::Value,
}

#[derive(Deserialize)]
struct GqlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GqlError>>,
}

#[derive(Deserialize)]
struct GqlError {
    message: String,
}

#[derive(Deserialize)]
struct SpacesData {
    organization: Organization,
}

#[derive(Deserialize)]
struct Organization {
    spaces: Vec<Space>,
}

#[derive(Deserialize)]
struct WorkItemsData {
    #[serde(rename = "workItems")]
    work_items: WorkItemPage,
}

#[derive(Deserialize)]
struct CreateLabelData {
    #[serde(rename = "createLabel")]
    create_label: CreatedLabel,
}

#[derive(Deserialize)]
struct CreatedLabel {
    label: LabelRef,
}

#[derive(Deserialize)]
struct LabelRef {
    id: String,
}

#[async_trait]
impl KitemakerApi for GraphQlClient {
    async fn list_spaces(&self) -> Result<Vec<Space>> {
        let data: SpacesData = self
            .execute("Spaces", SPACES_QUERY, serde_json::json!({}))
            .await?;
        Ok(data.organization.spaces)
    }

    async fn list_work_items(
        &self,
        space_id: &str,
        cursor: Option<&str>,
        count: usize,
    ) -> Result<WorkItemPage> {
        let data: WorkItemsData = self
            .execute(
                "WorkItems",
                WORK_ITEMS_QUERY,
                serde_json::json!({ "space": space_id, "cursor": cursor, "count": count }),
            )
            .await?;
        Ok(data.work_items)
    }

    async fn create_label(&self, space_id: &str, name: &str, color: &str) -> Result<String> {
        let data: CreateLabelData = self
            .execute(
                "CreateLabel",
                CREATE_LABEL_MUTATION,
                serde_json::json!({ "space": space_id, "name": name, "color": color }),
            )
            .await?;
        Ok(data.create_label.label.id)
    }

    async fn move_work_item(
        &self,
        work_item_id: &str,
        space_id: &str,
        status_id: &str,
    ) -> Result<()> {
        let _: IgnoredAny = self
            .execute(
                "MoveWorkItem",
                MOVE_WORK_ITEM_MUTATION,
                serde_json::json!({ "id": work_item_id, "space": space_id, "status": status_id }),
            )
            .await?;
        Ok(())
    }

    async fn set_labels(&self, work_item_id: &str, label_ids: &[String]) -> Result<()> {
        let _: IgnoredAny = self
            .execute(
                "SetLabels",
                SET_LABELS_MUTATION,
                serde_json::json!({ "id": work_item_id, "labels": label_ids }),
            )
            .await?;
        Ok(())
    }
}
