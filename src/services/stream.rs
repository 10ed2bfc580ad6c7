use uuid::Uuid;
use validator::Validate;

use crate::core::context::AppContext;
use crate::core::time::{format_primitive, primitive_now_utc};
use crate::db::models::StreamItem;
use crate::error::StoreError;
use crate::schemas::stream::{StreamItemData, StreamItemView};

/// Create or update a standalone stream item (announcements and the like).
/// Quizzes, assignments and materials manage their own anchor items through
/// their save operations.
pub async fn save_stream_item(
    ctx: &AppContext,
    data: StreamItemData,
) -> Result<StreamItemView, StoreError> {
    data.validate()?;
    let now = primitive_now_utc();

    let existing = match &data.id {
        Some(id) => {
            Some(ctx.backend().stream_item_by_id(id).await?.ok_or_else(|| {
                StoreError::not_found(format!("stream item {id}"))
            })?)
        }
        None => None,
    };
    let item = StreamItem {
        id: data.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        class_id: data.class_id,
        author_id: data.author_id,
        kind: data.kind,
        title: data.title,
        content: data.content,
        archived: existing.as_ref().is_some_and(|item| item.archived),
        created_at: existing.as_ref().map_or(now, |item| item.created_at),
    };
    ctx.backend().save_stream_item(&item).await?;
    Ok(stream_item_view(item))
}

pub async fn get_stream_item(
    ctx: &AppContext,
    id: &str,
) -> Result<Option<StreamItemView>, StoreError> {
    Ok(ctx.backend().stream_item_by_id(id).await?.map(stream_item_view))
}

/// Class stream, newest first. Archived items are hidden unless asked for.
pub async fn get_stream_items_by_class(
    ctx: &AppContext,
    class_id: &str,
    include_archived: bool,
) -> Result<Vec<StreamItemView>, StoreError> {
    let mut items = ctx.backend().stream_items_by_class(class_id).await?;
    if !include_archived {
        items.retain(|item| !item.archived);
    }
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(items.into_iter().map(stream_item_view).collect())
}

/// Archive or restore. Submission history is untouched either way.
pub async fn set_archived(ctx: &AppContext, id: &str, archived: bool) -> Result<(), StoreError> {
    ctx.backend().set_stream_item_archived(id, archived).await
}

pub async fn delete_stream_item(ctx: &AppContext, id: &str) -> Result<(), StoreError> {
    ctx.backend().delete_stream_item(id).await
}

pub(crate) fn stream_item_view(item: StreamItem) -> StreamItemView {
    StreamItemView {
        id: item.id,
        class_id: item.class_id,
        author_id: item.author_id,
        kind: item.kind,
        title: item.title,
        content: item.content,
        archived: item.archived,
        created_at: format_primitive(item.created_at),
    }
}
