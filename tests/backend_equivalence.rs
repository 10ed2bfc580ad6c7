//! One scripted flow executed against every reachable backend; the outputs
//! are normalized to stable fields (no ids, no timestamps) and must match
//! exactly across adapters.

mod common;

use careclass_core::core::context::AppContext;
use careclass_core::db::types::SubmissionStatus;
use careclass_core::schemas::submission::{QuizSubmissionData, ReviewData};
use careclass_core::services::{grades, quiz_submissions, quizzes, stream};

async fn run_script(ctx: &AppContext) -> Vec<String> {
    let class_id = common::seed_class(ctx, "Equivalence").await;
    let author_id = common::seed_teacher(ctx, "Sol Ferris").await;
    let grouped = common::seed_student(ctx, "Grouped Gwen", Some("wing-e")).await;
    let solo = common::seed_student(ctx, "Solo Sid", None).await;

    let mut data = common::quiz_data(&class_id, &author_id, "Wing E quiz");
    data.assign_to_all = false;
    data.assigned_groups = vec!["wing-e".to_string()];
    let quiz = quizzes::save_quiz(ctx, data).await.expect("save quiz");

    quiz_submissions::save_quiz_submission(
        ctx,
        QuizSubmissionData {
            quiz_id: quiz.id.clone(),
            student_id: grouped.clone(),
            answers: serde_json::json!({ "q0": "fine" }),
            status: SubmissionStatus::Submitted,
            student_comments: None,
        },
    )
    .await
    .expect("submit");

    let submission = quiz_submissions::get_quiz_submission(ctx, &quiz.id, &grouped)
        .await
        .expect("fetch submission")
        .expect("present");
    quiz_submissions::mark_as_reviewed(
        ctx,
        &submission.id,
        ReviewData { teacher_comments: Some("ok".to_string()), grade: Some(7.0) },
    )
    .await
    .expect("review");

    let mut lines = Vec::new();

    for summary in quizzes::get_quizzes_by_class(ctx, &class_id, true).await.expect("listing") {
        lines.push(format!(
            "summary {} class={:?} author={:?} points={} questions={} pending={} archived={}",
            summary.title,
            summary.class_title,
            summary.author_name,
            summary.points,
            summary.question_count,
            summary.pending_review_count,
            summary.archived,
        ));
    }

    for (label, student_id) in [("grouped", &grouped), ("solo", &solo)] {
        let sees = quizzes::get_quizzes_for_student(ctx, student_id)
            .await
            .expect("student listing")
            .iter()
            .any(|summary| summary.id == quiz.id);
        lines.push(format!("visible {label}={sees}"));
    }

    for view in quiz_submissions::get_quiz_submissions_by_quiz(ctx, &quiz.id)
        .await
        .expect("queue")
    {
        lines.push(format!(
            "submission status={:?} grade={:?} submitted={} reviewed={} graded={}",
            view.status,
            view.grade,
            view.submitted_at.is_some(),
            view.reviewed_at.is_some(),
            view.graded_at.is_some(),
        ));
    }

    for grade in grades::get_grades_for_class(ctx, &class_id).await.expect("grades") {
        lines.push(format!("grade value={}", grade.value));
    }

    for item in stream::get_stream_items_by_class(ctx, &class_id, true).await.expect("stream") {
        lines.push(format!("stream kind={:?} title={} archived={}", item.kind, item.title, item.archived));
    }

    lines
}

#[tokio::test]
async fn all_backends_produce_identical_normalized_output() {
    let mut reference: Option<(&'static str, Vec<String>)> = None;
    for (name, ctx) in common::contexts().await {
        let output = run_script(&ctx).await;
        match &reference {
            None => reference = Some((name, output)),
            Some((ref_name, ref_output)) => {
                assert_eq!(&output, ref_output, "{name} diverged from {ref_name}");
            }
        }
    }
}
