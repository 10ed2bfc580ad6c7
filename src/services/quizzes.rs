use std::collections::BTreeSet;

use sqlx::types::Json;
use uuid::Uuid;
use validator::Validate;

use crate::core::context::AppContext;
use crate::core::time::{format_primitive, primitive_now_utc};
use crate::db::models::{Quiz, QuizQuestion, QuizStudent, StreamItem};
use crate::db::types::StreamKind;
use crate::error::StoreError;
use crate::schemas::quiz::{QuestionView, QuizData, QuizSummary, QuizView};
use crate::services::visibility;

/// Create or update a quiz together with its anchor stream item. Questions
/// get fresh ids and a dense zero-based order; the stored student selection is
/// replaced with the payload's resolution.
pub async fn save_quiz(ctx: &AppContext, data: QuizData) -> Result<QuizView, StoreError> {
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
        kind: StreamKind::Quiz,
        title: data.title.clone(),
        content: data.content.clone(),
        archived: existing_item.as_ref().is_some_and(|item| item.archived),
        created_at: existing_item.as_ref().map_or(now, |item| item.created_at),
    };

    let existing_quiz = ctx.backend().quiz_by_stream_item(&item.id).await?;
    let quiz = Quiz {
        id: existing_quiz
            .as_ref()
            .map(|quiz| quiz.id.clone())
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        stream_item_id: item.id.clone(),
        points: data.points,
        due_at: data.due_at,
        description: data.description.clone(),
        assign_to_all: data.assign_to_all,
        assigned_groups: Json(data.assigned_groups.clone()),
        created_at: existing_quiz.as_ref().map_or(now, |quiz| quiz.created_at),
        updated_at: now,
    };

    let questions: Vec<QuizQuestion> = data
        .questions
        .iter()
        .enumerate()
        .map(|(index, question)| QuizQuestion {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz.id.clone(),
            title: question.title.clone(),
            kind: question.kind.clone(),
            required: question.required,
            points: question.points,
            correct_answer: Json(question.correct_answer.clone()),
            options: Json(question.options.clone()),
            order_index: index as i32,
        })
        .collect();

    let student_ids = visibility::resolve_assigned_student_ids(
        ctx,
        data.assign_to_all,
        &data.assigned_groups,
        &data.assigned_student_ids,
    )
    .await?;
    let students: Vec<QuizStudent> = student_ids
        .iter()
        .map(|student_id| QuizStudent {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz.id.clone(),
            student_id: student_id.clone(),
        })
        .collect();

    ctx.backend().save_stream_item(&item).await?;
    ctx.backend().save_quiz(&quiz, &questions, &students).await?;

    Ok(quiz_view(item, quiz, questions, student_ids))
}

/// None when the stream item does not exist or has no quiz attached; both are
/// legitimate for mixed streams.
pub async fn get_quiz_by_stream_item_id(
    ctx: &AppContext,
    stream_item_id: &str,
) -> Result<Option<QuizView>, StoreError> {
    let Some(item) = ctx.backend().stream_item_by_id(stream_item_id).await? else {
        return Ok(None);
    };
    let Some(quiz) = ctx.backend().quiz_by_stream_item(stream_item_id).await? else {
        return Ok(None);
    };
    let questions = ctx.backend().questions_by_quiz(&quiz.id).await?;
    let student_ids = ctx
        .backend()
        .quiz_students_by_quiz(&quiz.id)
        .await?
        .into_iter()
        .map(|row| row.student_id)
        .collect();
    Ok(Some(quiz_view(item, quiz, questions, student_ids)))
}

/// Every quiz with a live anchor, newest first. Archived quizzes are hidden
/// unless asked for; quizzes whose stream item is gone are skipped.
pub async fn get_all_quizzes(
    ctx: &AppContext,
    include_archived: bool,
) -> Result<Vec<QuizSummary>, StoreError> {
    let mut pairs = anchored_quizzes(ctx).await?;
    if !include_archived {
        pairs.retain(|(item, _)| !item.archived);
    }
    summarize_all(ctx, pairs).await
}

pub async fn get_quizzes_by_class(
    ctx: &AppContext,
    class_id: &str,
    include_archived: bool,
) -> Result<Vec<QuizSummary>, StoreError> {
    let mut pairs = anchored_quizzes(ctx).await?;
    pairs.retain(|(item, _)| {
        item.class_id == class_id && (include_archived || !item.archived)
    });
    summarize_all(ctx, pairs).await
}

/// Quizzes the student can see, visibility resolved here and nowhere else.
pub async fn get_quizzes_for_student(
    ctx: &AppContext,
    student_id: &str,
) -> Result<Vec<QuizSummary>, StoreError> {
    let group = ctx.backend().user_by_id(student_id).await?.and_then(|user| user.group_name);
    let individually_assigned: BTreeSet<String> =
        ctx.backend().quiz_ids_for_student(student_id).await?.into_iter().collect();

    let mut pairs = anchored_quizzes(ctx).await?;
    pairs.retain(|(item, quiz)| {
        !item.archived
            && visibility::visible_to_student(
                quiz.assign_to_all,
                individually_assigned.contains(&quiz.id),
                &quiz.assigned_groups.0,
                group.as_deref(),
            )
    });
    summarize_all(ctx, pairs).await
}

/// Remove the quiz, its children, its submissions and its anchor item.
pub async fn delete_quiz(ctx: &AppContext, id: &str) -> Result<(), StoreError> {
    let quiz = ctx
        .backend()
        .quiz_by_id(id)
        .await?
        .ok_or_else(|| StoreError::not_found(format!("quiz {id}")))?;

    for submission in ctx.backend().quiz_submissions_by_quiz(id).await? {
        ctx.backend().delete_quiz_submission(&submission.id).await?;
    }
    ctx.backend().delete_quiz(id).await?;
    ctx.backend().delete_stream_item(&quiz.stream_item_id).await?;
    Ok(())
}

async fn anchored_quizzes(ctx: &AppContext) -> Result<Vec<(StreamItem, Quiz)>, StoreError> {
    let mut pairs = Vec::new();
    for quiz in ctx.backend().list_quizzes().await? {
        if let Some(item) = ctx.backend().stream_item_by_id(&quiz.stream_item_id).await? {
            pairs.push((item, quiz));
        }
    }
    pairs.sort_by(|(a, _), (b, _)| b.created_at.cmp(&a.created_at));
    Ok(pairs)
}

async fn summarize_all(
    ctx: &AppContext,
    pairs: Vec<(StreamItem, Quiz)>,
) -> Result<Vec<QuizSummary>, StoreError> {
    let mut summaries = Vec::with_capacity(pairs.len());
    for (item, quiz) in pairs {
        summaries.push(summarize(ctx, item, quiz).await?);
    }
    Ok(summaries)
}

async fn summarize(
    ctx: &AppContext,
    item: StreamItem,
    quiz: Quiz,
) -> Result<QuizSummary, StoreError> {
    let class_title = ctx.backend().class_by_id(&item.class_id).await?.map(|class| class.title);
    let author_name =
        ctx.backend().user_by_id(&item.author_id).await?.map(|user| user.full_name);
    let question_count = ctx.backend().questions_by_quiz(&quiz.id).await?.len();
    let pending_review_count = ctx
        .backend()
        .quiz_submissions_by_quiz(&quiz.id)
        .await?
        .iter()
        .filter(|submission| submission.status.awaits_review())
        .count();

    Ok(QuizSummary {
        id: quiz.id,
        stream_item_id: item.id,
        class_id: item.class_id,
        class_title,
        author_name,
        title: item.title,
        points: quiz.points,
        due_at: quiz.due_at.map(format_primitive),
        question_count,
        pending_review_count,
        archived: item.archived,
    })
}

fn quiz_view(
    item: StreamItem,
    quiz: Quiz,
    questions: Vec<QuizQuestion>,
    assigned_student_ids: Vec<String>,
) -> QuizView {
    QuizView {
        id: quiz.id,
        stream_item_id: item.id,
        class_id: item.class_id,
        author_id: item.author_id,
        title: item.title,
        content: item.content,
        archived: item.archived,
        points: quiz.points,
        due_at: quiz.due_at.map(format_primitive),
        description: quiz.description,
        assign_to_all: quiz.assign_to_all,
        assigned_groups: quiz.assigned_groups.0,
        assigned_student_ids,
        questions: questions
            .into_iter()
            .map(|question| QuestionView {
                id: question.id,
                title: question.title,
                kind: question.kind,
                required: question.required,
                points: question.points,
                correct_answer: question.correct_answer.0,
                options: question.options.0,
                order_index: question.order_index,
            })
            .collect(),
        created_at: format_primitive(quiz.created_at),
        updated_at: format_primitive(quiz.updated_at),
    }
}
