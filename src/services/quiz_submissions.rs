use sqlx::types::Json;
use uuid::Uuid;
use validator::Validate;

use crate::core::context::AppContext;
use crate::core::time::{format_primitive, primitive_now_utc};
use crate::db::models::{Grade, QuizSubmission};
use crate::db::types::SubmissionStatus;
use crate::error::StoreError;
use crate::schemas::submission::{QuizSubmissionData, QuizSubmissionView, ReviewData};
use crate::services::lifecycle;

/// Student-side save: upsert keyed on `(quiz_id, student_id)`. The lifecycle
/// clamp makes repeated autosaves harmless; reviewer-owned fields (grade,
/// teacher comments) are preserved, never cleared by a student save.
pub async fn save_quiz_submission(
    ctx: &AppContext,
    data: QuizSubmissionData,
) -> Result<QuizSubmissionView, StoreError> {
    data.validate()?;
    let quiz_id = &data.quiz_id;
    ctx.backend()
        .quiz_by_id(quiz_id)
        .await?
        .ok_or_else(|| StoreError::not_found(format!("quiz {quiz_id}")))?;

    let now = primitive_now_utc();
    let prior = ctx.backend().quiz_submission_for_student(quiz_id, &data.student_id).await?;
    let prior_state = prior.as_ref().map(|p| lifecycle::Prior {
        status: p.status,
        submitted_at: p.submitted_at,
        reviewed_at: p.reviewed_at,
        graded_at: p.graded_at,
    });
    let resolution = lifecycle::resolve(prior_state.as_ref(), data.status, false, now);

    let submission = QuizSubmission {
        id: prior
            .as_ref()
            .map(|p| p.id.clone())
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        quiz_id: data.quiz_id,
        student_id: data.student_id,
        answers: Json(data.answers),
        status: resolution.status,
        grade: prior.as_ref().and_then(|p| p.grade),
        student_comments: data.student_comments,
        teacher_comments: prior.as_ref().and_then(|p| p.teacher_comments.clone()),
        submitted_at: resolution.submitted_at,
        reviewed_at: resolution.reviewed_at,
        graded_at: resolution.graded_at,
        created_at: prior.as_ref().map_or(now, |p| p.created_at),
        updated_at: now,
    };
    ctx.backend().upsert_quiz_submission(&submission).await?;
    Ok(submission_view(submission))
}

pub async fn get_quiz_submission(
    ctx: &AppContext,
    quiz_id: &str,
    student_id: &str,
) -> Result<Option<QuizSubmissionView>, StoreError> {
    Ok(ctx
        .backend()
        .quiz_submission_for_student(quiz_id, student_id)
        .await?
        .map(submission_view))
}

/// Review queue order: submitted work first, newest submission first; drafts
/// that never left the student trail behind.
pub async fn get_quiz_submissions_by_quiz(
    ctx: &AppContext,
    quiz_id: &str,
) -> Result<Vec<QuizSubmissionView>, StoreError> {
    let mut submissions = ctx.backend().quiz_submissions_by_quiz(quiz_id).await?;
    submissions.sort_by(|a, b| match (b.submitted_at, a.submitted_at) {
        (Some(b_at), Some(a_at)) => b_at.cmp(&a_at),
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (None, None) => b.updated_at.cmp(&a.updated_at),
    });
    Ok(submissions.into_iter().map(submission_view).collect())
}

/// Claim a submission for review. NotFound on unknown ids; never creates rows.
pub async fn mark_as_to_review(
    ctx: &AppContext,
    id: &str,
) -> Result<QuizSubmissionView, StoreError> {
    let submission = ctx
        .backend()
        .quiz_submission_by_id(id)
        .await?
        .ok_or_else(|| StoreError::not_found(format!("quiz submission {id}")))?;
    transition(ctx, submission, SubmissionStatus::ToReview, None, None).await
}

/// Terminal transition. An attached grade is also written through to the
/// grades surface, keyed on the quiz's stream item and the student.
pub async fn mark_as_reviewed(
    ctx: &AppContext,
    id: &str,
    review: ReviewData,
) -> Result<QuizSubmissionView, StoreError> {
    review.validate()?;
    let submission = ctx
        .backend()
        .quiz_submission_by_id(id)
        .await?
        .ok_or_else(|| StoreError::not_found(format!("quiz submission {id}")))?;
    transition(
        ctx,
        submission,
        SubmissionStatus::Reviewed,
        review.teacher_comments,
        review.grade,
    )
    .await
}

async fn transition(
    ctx: &AppContext,
    prior: QuizSubmission,
    requested: SubmissionStatus,
    teacher_comments: Option<String>,
    grade: Option<f64>,
) -> Result<QuizSubmissionView, StoreError> {
    let now = primitive_now_utc();
    let grade = grade.or(prior.grade);
    let prior_state = lifecycle::Prior {
        status: prior.status,
        submitted_at: prior.submitted_at,
        reviewed_at: prior.reviewed_at,
        graded_at: prior.graded_at,
    };
    let resolution = lifecycle::resolve(Some(&prior_state), requested, grade.is_some(), now);

    let submission = QuizSubmission {
        status: resolution.status,
        grade,
        teacher_comments: teacher_comments.or(prior.teacher_comments),
        submitted_at: resolution.submitted_at,
        reviewed_at: resolution.reviewed_at,
        graded_at: resolution.graded_at,
        updated_at: now,
        ..prior
    };
    ctx.backend().upsert_quiz_submission(&submission).await?;

    if let Some(value) = submission.grade {
        if let Some(quiz) = ctx.backend().quiz_by_id(&submission.quiz_id).await? {
            let grade_row = Grade {
                id: Uuid::new_v4().to_string(),
                stream_item_id: quiz.stream_item_id,
                student_id: submission.student_id.clone(),
                value,
                graded_at: submission.graded_at.unwrap_or(now),
                created_at: now,
                updated_at: now,
            };
            ctx.backend().upsert_grade(&grade_row).await?;
        }
    }

    Ok(submission_view(submission))
}

pub(crate) fn submission_view(submission: QuizSubmission) -> QuizSubmissionView {
    QuizSubmissionView {
        id: submission.id,
        quiz_id: submission.quiz_id,
        student_id: submission.student_id,
        answers: submission.answers.0,
        status: submission.status,
        grade: submission.grade,
        student_comments: submission.student_comments,
        teacher_comments: submission.teacher_comments,
        submitted_at: submission.submitted_at.map(format_primitive),
        reviewed_at: submission.reviewed_at.map(format_primitive),
        graded_at: submission.graded_at.map(format_primitive),
        created_at: format_primitive(submission.created_at),
        updated_at: format_primitive(submission.updated_at),
    }
}
