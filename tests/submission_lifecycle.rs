mod common;

use careclass_core::db::types::SubmissionStatus;
use careclass_core::schemas::submission::{QuizSubmissionData, ReviewData};
use careclass_core::services::{grades, quiz_submissions, quizzes};
use careclass_core::StoreError;

fn submission(quiz_id: &str, student_id: &str, status: SubmissionStatus) -> QuizSubmissionData {
    QuizSubmissionData {
        quiz_id: quiz_id.to_string(),
        student_id: student_id.to_string(),
        answers: serde_json::json!({ "q0": "well, thanks" }),
        status,
        student_comments: None,
    }
}

#[tokio::test]
async fn saving_against_a_missing_quiz_is_not_found() {
    for (name, ctx) in common::contexts().await {
        let student_id = common::seed_student(&ctx, "Ana Bell", None).await;
        let err = quiz_submissions::save_quiz_submission(
            &ctx,
            submission("no-such-quiz", &student_id, SubmissionStatus::Draft),
        )
        .await
        .expect_err("missing quiz must fail");
        assert!(matches!(err, StoreError::NotFound(_)), "backend {name}");
    }
}

#[tokio::test]
async fn upsert_keeps_one_row_per_student() {
    for (name, ctx) in common::contexts().await {
        let class_id = common::seed_class(&ctx, "Daily Check").await;
        let author_id = common::seed_teacher(&ctx, "Lea Moss").await;
        let student_id = common::seed_student(&ctx, "Odin Park", None).await;
        let quiz = quizzes::save_quiz(&ctx, common::quiz_data(&class_id, &author_id, "Check"))
            .await
            .expect("save quiz");

        let first = quiz_submissions::save_quiz_submission(
            &ctx,
            submission(&quiz.id, &student_id, SubmissionStatus::Draft),
        )
        .await
        .expect("first save");
        let second = quiz_submissions::save_quiz_submission(
            &ctx,
            submission(&quiz.id, &student_id, SubmissionStatus::Draft),
        )
        .await
        .expect("second save");

        assert_eq!(second.id, first.id, "backend {name}");
        assert_eq!(second.created_at, first.created_at);

        let all = quiz_submissions::get_quiz_submissions_by_quiz(&ctx, &quiz.id)
            .await
            .expect("listing");
        assert_eq!(all.len(), 1);
    }
}

#[tokio::test]
async fn status_is_monotone_and_submitted_at_is_stable() {
    for (name, ctx) in common::contexts().await {
        let class_id = common::seed_class(&ctx, "Evening Quiz").await;
        let author_id = common::seed_teacher(&ctx, "Mia Flint").await;
        let student_id = common::seed_student(&ctx, "Sam Reed", None).await;
        let quiz = quizzes::save_quiz(&ctx, common::quiz_data(&class_id, &author_id, "Evening"))
            .await
            .expect("save quiz");

        let submitted = quiz_submissions::save_quiz_submission(
            &ctx,
            submission(&quiz.id, &student_id, SubmissionStatus::Submitted),
        )
        .await
        .expect("submit");
        let stamp = submitted.submitted_at.clone().expect("submitted_at set");

        // A stale draft autosave arrives after the submit.
        let after = quiz_submissions::save_quiz_submission(
            &ctx,
            submission(&quiz.id, &student_id, SubmissionStatus::Draft),
        )
        .await
        .expect("late autosave");
        assert_eq!(after.status, SubmissionStatus::Submitted, "backend {name}");
        assert_eq!(after.submitted_at.as_deref(), Some(stamp.as_str()));
    }
}

#[tokio::test]
async fn review_transitions_require_existing_rows() {
    for (name, ctx) in common::contexts().await {
        let err = quiz_submissions::mark_as_to_review(&ctx, "no-such-submission")
            .await
            .expect_err("unknown id must fail");
        assert!(matches!(err, StoreError::NotFound(_)), "backend {name}");

        let err = quiz_submissions::mark_as_reviewed(
            &ctx,
            "no-such-submission",
            ReviewData { teacher_comments: None, grade: None },
        )
        .await
        .expect_err("unknown id must fail");
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}

#[tokio::test]
async fn review_flow_updates_counts_and_writes_the_grade() {
    for (name, ctx) in common::contexts().await {
        let class_id = common::seed_class(&ctx, "Memory Lane").await;
        let author_id = common::seed_teacher(&ctx, "Joy Hart").await;
        let student_id = common::seed_student(&ctx, "Pia Stone", None).await;
        let quiz = quizzes::save_quiz(&ctx, common::quiz_data(&class_id, &author_id, "Recall"))
            .await
            .expect("save quiz");

        let saved = quiz_submissions::save_quiz_submission(
            &ctx,
            submission(&quiz.id, &student_id, SubmissionStatus::Submitted),
        )
        .await
        .expect("submit");

        let pending = |summaries: Vec<careclass_core::schemas::quiz::QuizSummary>| {
            summaries.into_iter().find(|s| s.id == quiz.id).expect("quiz listed")
        };
        let listed = pending(
            quizzes::get_quizzes_by_class(&ctx, &class_id, false).await.expect("listing"),
        );
        assert_eq!(listed.pending_review_count, 1, "backend {name}");

        let claimed =
            quiz_submissions::mark_as_to_review(&ctx, &saved.id).await.expect("to review");
        assert_eq!(claimed.status, SubmissionStatus::ToReview);

        let reviewed = quiz_submissions::mark_as_reviewed(
            &ctx,
            &saved.id,
            ReviewData { teacher_comments: Some("nice work".to_string()), grade: Some(8.5) },
        )
        .await
        .expect("review");
        assert_eq!(reviewed.status, SubmissionStatus::Reviewed);
        assert_eq!(reviewed.grade, Some(8.5));
        assert!(reviewed.reviewed_at.is_some());
        assert!(reviewed.graded_at.is_some());

        let listed = pending(
            quizzes::get_quizzes_by_class(&ctx, &class_id, false).await.expect("listing"),
        );
        assert_eq!(listed.pending_review_count, 0);

        let student_grades =
            grades::get_grades_for_student(&ctx, &student_id).await.expect("student grades");
        assert!(student_grades
            .iter()
            .any(|g| g.stream_item_id == quiz.stream_item_id && g.value == 8.5));
        let class_grades =
            grades::get_grades_for_class(&ctx, &class_id).await.expect("class grades");
        assert!(class_grades.iter().any(|g| g.student_id == student_id && g.value == 8.5));
    }
}

#[tokio::test]
async fn review_queue_orders_submitted_before_drafts() {
    for (name, ctx) in common::contexts().await {
        let class_id = common::seed_class(&ctx, "Order Check").await;
        let author_id = common::seed_teacher(&ctx, "Teo Marsh").await;
        let drafter = common::seed_student(&ctx, "Draft Dana", None).await;
        let submitter = common::seed_student(&ctx, "Submit Sol", None).await;
        let quiz = quizzes::save_quiz(&ctx, common::quiz_data(&class_id, &author_id, "Queue"))
            .await
            .expect("save quiz");

        quiz_submissions::save_quiz_submission(
            &ctx,
            submission(&quiz.id, &drafter, SubmissionStatus::Draft),
        )
        .await
        .expect("draft");
        quiz_submissions::save_quiz_submission(
            &ctx,
            submission(&quiz.id, &submitter, SubmissionStatus::Submitted),
        )
        .await
        .expect("submit");

        let queue = quiz_submissions::get_quiz_submissions_by_quiz(&ctx, &quiz.id)
            .await
            .expect("queue");
        assert_eq!(queue.len(), 2, "backend {name}");
        assert_eq!(queue[0].student_id, submitter);
        assert_eq!(queue[1].student_id, drafter);
    }
}
