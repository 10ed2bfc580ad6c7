use uuid::Uuid;
use validator::Validate;

use crate::core::context::AppContext;
use crate::core::time::{format_primitive, primitive_now_utc};
use crate::db::models::{Attachment, Material, StreamItem};
use crate::db::types::StreamKind;
use crate::error::StoreError;
use crate::schemas::material::{AttachmentView, MaterialData, MaterialView};

/// Create or update a material with its anchor stream item. The attachment
/// list is replaced wholesale, keeping the payload order.
pub async fn save_material(
    ctx: &AppContext,
    data: MaterialData,
) -> Result<MaterialView, StoreError> {
    data.validate()?;
    let now = primitive_now_utc();

    let existing_item = match &data.stream_item_id {
        Some(id) => Some(
            ctx.backend()
                .stream_item_by_id(id)
                .await?
                .ok_or_else(|| StoreError::not_found(format!("stream item {id}")))?,
        ),
        None => None,
    };
    let item = StreamItem {
        id: existing_item
            .as_ref()
            .map(|item| item.id.clone())
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        class_id: data.class_id.clone(),
        author_id: data.author_id.clone(),
        kind: StreamKind::Material,
        title: data.title.clone(),
        content: data.content.clone(),
        archived: existing_item.as_ref().is_some_and(|item| item.archived),
        created_at: existing_item.as_ref().map_or(now, |item| item.created_at),
    };

    let existing = ctx.backend().material_by_stream_item(&item.id).await?;
    let material = Material {
        id: existing
            .as_ref()
            .map(|material| material.id.clone())
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        stream_item_id: item.id.clone(),
        description: data.description.clone(),
        created_at: existing.as_ref().map_or(now, |material| material.created_at),
        updated_at: now,
    };

    let attachments: Vec<Attachment> = data
        .attachments
        .iter()
        .enumerate()
        .map(|(index, attachment)| Attachment {
            id: Uuid::new_v4().to_string(),
            material_id: material.id.clone(),
            title: attachment.title.clone(),
            url: attachment.url.clone(),
            kind: attachment.kind.clone(),
            order_index: index as i32,
        })
        .collect();

    ctx.backend().save_stream_item(&item).await?;
    ctx.backend().save_material(&material, &attachments).await?;

    Ok(material_view(item, material, attachments))
}

pub async fn get_material_by_stream_item_id(
    ctx: &AppContext,
    stream_item_id: &str,
) -> Result<Option<MaterialView>, StoreError> {
    let Some(item) = ctx.backend().stream_item_by_id(stream_item_id).await? else {
        return Ok(None);
    };
    let Some(material) = ctx.backend().material_by_stream_item(stream_item_id).await? else {
        return Ok(None);
    };
    let attachments = ctx.backend().attachments_by_material(&material.id).await?;
    Ok(Some(material_view(item, material, attachments)))
}

/// Archived materials are hidden unless asked for.
pub async fn get_all_materials(
    ctx: &AppContext,
    include_archived: bool,
) -> Result<Vec<MaterialView>, StoreError> {
    let mut pairs = anchored_materials(ctx).await?;
    if !include_archived {
        pairs.retain(|(item, _)| !item.archived);
    }
    resolve_views(ctx, pairs).await
}

pub async fn get_materials_by_class(
    ctx: &AppContext,
    class_id: &str,
    include_archived: bool,
) -> Result<Vec<MaterialView>, StoreError> {
    let mut pairs = anchored_materials(ctx).await?;
    pairs.retain(|(item, _)| {
        item.class_id == class_id && (include_archived || !item.archived)
    });
    resolve_views(ctx, pairs).await
}

pub async fn delete_material(ctx: &AppContext, id: &str) -> Result<(), StoreError> {
    let material = ctx
        .backend()
        .material_by_id(id)
        .await?
        .ok_or_else(|| StoreError::not_found(format!("material {id}")))?;
    ctx.backend().delete_material(id).await?;
    ctx.backend().delete_stream_item(&material.stream_item_id).await?;
    Ok(())
}

async fn anchored_materials(
    ctx: &AppContext,
) -> Result<Vec<(StreamItem, Material)>, StoreError> {
    let mut pairs = Vec::new();
    for material in ctx.backend().list_materials().await? {
        if let Some(item) = ctx.backend().stream_item_by_id(&material.stream_item_id).await? {
            pairs.push((item, material));
        }
    }
    pairs.sort_by(|(a, _), (b, _)| b.created_at.cmp(&a.created_at));
    Ok(pairs)
}

async fn resolve_views(
    ctx: &AppContext,
    pairs: Vec<(StreamItem, Material)>,
) -> Result<Vec<MaterialView>, StoreError> {
    let mut views = Vec::with_capacity(pairs.len());
    for (item, material) in pairs {
        let attachments = ctx.backend().attachments_by_material(&material.id).await?;
        views.push(material_view(item, material, attachments));
    }
    Ok(views)
}

fn material_view(
    item: StreamItem,
    material: Material,
    attachments: Vec<Attachment>,
) -> MaterialView {
    MaterialView {
        id: material.id,
        stream_item_id: item.id,
        class_id: item.class_id,
        author_id: item.author_id,
        title: item.title,
        content: item.content,
        description: material.description,
        archived: item.archived,
        attachments: attachments
            .into_iter()
            .map(|attachment| AttachmentView {
                id: attachment.id,
                title: attachment.title,
                url: attachment.url,
                kind: attachment.kind,
                order_index: attachment.order_index,
            })
            .collect(),
        created_at: format_primitive(material.created_at),
        updated_at: format_primitive(material.updated_at),
    }
}
