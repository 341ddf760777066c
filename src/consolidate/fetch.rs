use anyhow::Result;
use tracing::debug;

use crate::api::KitemakerApi;
use crate::model::work_item::WorkItem;

/// Follow the cursor until the server reports no more pages and return every
/// item of the space in server order.
pub async fn fetch_all_items(
    api: &dyn KitemakerApi,
    space_id: &str,
    page_size: usize,
) -> Result<Vec<WorkItem>> {
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;
    let mut has_more = true;
    let mut pages = 0usize;

    while has_more {
        let page = api
            .list_work_items(space_id, cursor.as_deref(), page_size)
            .await?;
        pages += 1;
        debug!(
            space_id,
            page = pages,
            count = page.work_items.len(),
            has_more = page.has_more,
            "fetched work item page"
        );

        items.extend(page.work_items);
        cursor = page.cursor;
        has_more = page.has_more;
    }

    Ok(items)
}
