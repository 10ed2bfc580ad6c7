use std::collections::BTreeSet;

use sqlx::types::Json;
use uuid::Uuid;
use validator::Validate;

use crate::core::context::AppContext;
use crate::core::time::{format_primitive, primitive_now_utc};
use crate::db::models::{Assignment, AssignmentStudent, StreamItem};
use crate::db::types::StreamKind;
use crate::error::StoreError;
use crate::schemas::assignment::{AssignmentData, AssignmentSummary, AssignmentView};
use crate::services::visibility;

pub async fn save_assignment(
    ctx: &AppContext,
    data: AssignmentData,
) -> Result<AssignmentView, StoreError> {
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
        kind: StreamKind::Assignment,
        title: data.title.clone(),
        content: data.content.clone(),
        archived: existing_item.as_ref().is_some_and(|item| item.archived),
        created_at: existing_item.as_ref().map_or(now, |item| item.created_at),
    };

    let existing = ctx.backend().assignment_by_stream_item(&item.id).await?;
    let assignment = Assignment {
        id: existing
            .as_ref()
            .map(|assignment| assignment.id.clone())
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        stream_item_id: item.id.clone(),
        points: data.points,
        due_at: data.due_at,
        description: data.description.clone(),
        assign_to_all: data.assign_to_all,
        assigned_groups: Json(data.assigned_groups.clone()),
        created_at: existing.as_ref().map_or(now, |assignment| assignment.created_at),
        updated_at: now,
    };

    let student_ids = visibility::resolve_assigned_student_ids(
        ctx,
        data.assign_to_all,
        &data.assigned_groups,
        &data.assigned_student_ids,
    )
    .await?;
    let students: Vec<AssignmentStudent> = student_ids
        .iter()
        .map(|student_id| AssignmentStudent {
            id: Uuid::new_v4().to_string(),
            assignment_id: assignment.id.clone(),
            student_id: student_id.clone(),
        })
        .collect();

    ctx.backend().save_stream_item(&item).await?;
    ctx.backend().save_assignment(&assignment, &students).await?;

    Ok(assignment_view(item, assignment, student_ids))
}

pub async fn get_assignment_by_stream_item_id(
    ctx: &AppContext,
    stream_item_id: &str,
) -> Result<Option<AssignmentView>, StoreError> {
    let Some(item) = ctx.backend().stream_item_by_id(stream_item_id).await? else {
        return Ok(None);
    };
    let Some(assignment) = ctx.backend().assignment_by_stream_item(stream_item_id).await? else {
        return Ok(None);
    };
    let student_ids = ctx
        .backend()
        .assignment_students_by_assignment(&assignment.id)
        .await?
        .into_iter()
        .map(|row| row.student_id)
        .collect();
    Ok(Some(assignment_view(item, assignment, student_ids)))
}

/// Archived assignments are hidden unless asked for.
pub async fn get_all_assignments(
    ctx: &AppContext,
    include_archived: bool,
) -> Result<Vec<AssignmentSummary>, StoreError> {
    let mut pairs = anchored_assignments(ctx).await?;
    if !include_archived {
        pairs.retain(|(item, _)| !item.archived);
    }
    summarize_all(ctx, pairs).await
}

pub async fn get_assignments_by_class(
    ctx: &AppContext,
    class_id: &str,
    include_archived: bool,
) -> Result<Vec<AssignmentSummary>, StoreError> {
    let mut pairs = anchored_assignments(ctx).await?;
    pairs.retain(|(item, _)| {
        item.class_id == class_id && (include_archived || !item.archived)
    });
    summarize_all(ctx, pairs).await
}

pub async fn get_assignments_for_student(
    ctx: &AppContext,
    student_id: &str,
) -> Result<Vec<AssignmentSummary>, StoreError> {
    let group = ctx.backend().user_by_id(student_id).await?.and_then(|user| user.group_name);
    let individually_assigned: BTreeSet<String> =
        ctx.backend().assignment_ids_for_student(student_id).await?.into_iter().collect();

    let mut pairs = anchored_assignments(ctx).await?;
    pairs.retain(|(item, assignment)| {
        !item.archived
            && visibility::visible_to_student(
                assignment.assign_to_all,
                individually_assigned.contains(&assignment.id),
                &assignment.assigned_groups.0,
                group.as_deref(),
            )
    });
    summarize_all(ctx, pairs).await
}

pub async fn delete_assignment(ctx: &AppContext, id: &str) -> Result<(), StoreError> {
    let assignment = ctx
        .backend()
        .assignment_by_id(id)
        .await?
        .ok_or_else(|| StoreError::not_found(format!("assignment {id}")))?;

    for submission in ctx.backend().assignment_submissions_by_assignment(id).await? {
        ctx.backend().delete_assignment_submission(&submission.id).await?;
    }
    ctx.backend().delete_assignment(id).await?;
    ctx.backend().delete_stream_item(&assignment.stream_item_id).await?;
    Ok(())
}

async fn anchored_assignments(
    ctx: &AppContext,
) -> Result<Vec<(StreamItem, Assignment)>, StoreError> {
    let mut pairs = Vec::new();
    for assignment in ctx.backend().list_assignments().await? {
        if let Some(item) = ctx.backend().stream_item_by_id(&assignment.stream_item_id).await? {
            pairs.push((item, assignment));
        }
    }
    pairs.sort_by(|(a, _), (b, _)| b.created_at.cmp(&a.created_at));
    Ok(pairs)
}

async fn summarize_all(
    ctx: &AppContext,
    pairs: Vec<(StreamItem, Assignment)>,
) -> Result<Vec<AssignmentSummary>, StoreError> {
    let mut summaries = Vec::with_capacity(pairs.len());
    for (item, assignment) in pairs {
        summaries.push(summarize(ctx, item, assignment).await?);
    }
    Ok(summaries)
}

async fn summarize(
    ctx: &AppContext,
    item: StreamItem,
    assignment: Assignment,
) -> Result<AssignmentSummary, StoreError> {
    let class_title = ctx.backend().class_by_id(&item.class_id).await?.map(|class| class.title);
    let author_name =
        ctx.backend().user_by_id(&item.author_id).await?.map(|user| user.full_name);
    let pending_review_count = ctx
        .backend()
        .assignment_submissions_by_assignment(&assignment.id)
        .await?
        .iter()
        .filter(|submission| submission.status.awaits_review())
        .count();

    Ok(AssignmentSummary {
        id: assignment.id,
        stream_item_id: item.id,
        class_id: item.class_id,
        class_title,
        author_name,
        title: item.title,
        points: assignment.points,
        due_at: assignment.due_at.map(format_primitive),
        pending_review_count,
        archived: item.archived,
    })
}

fn assignment_view(
    item: StreamItem,
    assignment: Assignment,
    assigned_student_ids: Vec<String>,
) -> AssignmentView {
    AssignmentView {
        id: assignment.id,
        stream_item_id: item.id,
        class_id: item.class_id,
        author_id: item.author_id,
        title: item.title,
        content: item.content,
        archived: item.archived,
        points: assignment.points,
        due_at: assignment.due_at.map(format_primitive),
        description: assignment.description,
        assign_to_all: assignment.assign_to_all,
        assigned_groups: assignment.assigned_groups.0,
        assigned_student_ids,
        created_at: format_primitive(assignment.created_at),
        updated_at: format_primitive(assignment.updated_at),
    }
}
