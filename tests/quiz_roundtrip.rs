mod common;

use careclass_core::db::types::SubmissionStatus;
use careclass_core::schemas::submission::{QuizSubmissionData, ReviewData};
use careclass_core::services::{quiz_submissions, quizzes, stream};

#[tokio::test]
async fn saved_quiz_round_trips_through_its_stream_item() {
    for (name, ctx) in common::contexts().await {
        let class_id = common::seed_class(&ctx, "Morning Wellness").await;
        let author_id = common::seed_teacher(&ctx, "Nora Hale").await;

        let saved = quizzes::save_quiz(&ctx, common::quiz_data(&class_id, &author_id, "Check-in"))
            .await
            .expect("save quiz");
        assert_eq!(saved.title, "Check-in", "backend {name}");
        assert_eq!(saved.questions.len(), 2);

        let fetched = quizzes::get_quiz_by_stream_item_id(&ctx, &saved.stream_item_id)
            .await
            .expect("fetch quiz")
            .expect("quiz present");
        assert_eq!(fetched.id, saved.id);
        assert_eq!(fetched.class_id, class_id);
        assert_eq!(fetched.questions.len(), 2);
        // Dense zero-based question order, as sent.
        assert_eq!(fetched.questions[0].order_index, 0);
        assert_eq!(fetched.questions[0].title, "How are you feeling today?");
        assert_eq!(fetched.questions[1].order_index, 1);

        let missing = quizzes::get_quiz_by_stream_item_id(&ctx, "no-such-item")
            .await
            .expect("fetch missing");
        assert!(missing.is_none(), "backend {name}");
    }
}

#[tokio::test]
async fn update_keeps_identity_and_replaces_questions() {
    for (name, ctx) in common::contexts().await {
        let class_id = common::seed_class(&ctx, "Crafts").await;
        let author_id = common::seed_teacher(&ctx, "Ben Ato").await;

        let first = quizzes::save_quiz(&ctx, common::quiz_data(&class_id, &author_id, "Round 1"))
            .await
            .expect("save quiz");

        let mut update = common::quiz_data(&class_id, &author_id, "Round 1 revised");
        update.stream_item_id = Some(first.stream_item_id.clone());
        update.questions.truncate(1);
        let second = quizzes::save_quiz(&ctx, update).await.expect("update quiz");

        assert_eq!(second.id, first.id, "backend {name}");
        assert_eq!(second.stream_item_id, first.stream_item_id);
        assert_eq!(second.title, "Round 1 revised");
        assert_eq!(second.questions.len(), 1);

        let fetched = quizzes::get_quiz_by_stream_item_id(&ctx, &first.stream_item_id)
            .await
            .expect("fetch")
            .expect("present");
        assert_eq!(fetched.questions.len(), 1);
    }
}

#[tokio::test]
async fn class_listing_annotates_and_hides_archived() {
    for (name, ctx) in common::contexts().await {
        let class_id = common::seed_class(&ctx, "Garden Club").await;
        let author_id = common::seed_teacher(&ctx, "Iris Vale").await;

        let kept = quizzes::save_quiz(&ctx, common::quiz_data(&class_id, &author_id, "Kept"))
            .await
            .expect("save kept");
        let archived =
            quizzes::save_quiz(&ctx, common::quiz_data(&class_id, &author_id, "Archived"))
                .await
                .expect("save archived");
        stream::set_archived(&ctx, &archived.stream_item_id, true).await.expect("archive");

        let active = quizzes::get_quizzes_by_class(&ctx, &class_id, false)
            .await
            .expect("active listing");
        assert_eq!(active.len(), 1, "backend {name}");
        assert_eq!(active[0].id, kept.id);
        assert_eq!(active[0].class_title.as_deref(), Some("Garden Club"));
        assert_eq!(active[0].author_name.as_deref(), Some("Iris Vale"));
        assert_eq!(active[0].question_count, 2);
        assert_eq!(active[0].pending_review_count, 0);

        let all = quizzes::get_quizzes_by_class(&ctx, &class_id, true)
            .await
            .expect("full listing");
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|summary| summary.id == archived.id && summary.archived));
    }
}

#[tokio::test]
async fn global_listing_tracks_review_counts_and_hides_archived() {
    for (name, ctx) in common::contexts().await {
        let class_id = common::seed_class(&ctx, "Afternoon Round").await;
        let author_id = common::seed_teacher(&ctx, "Lou Bram").await;
        let student_id = common::seed_student(&ctx, "Gil Hart", None).await;

        let quiz = quizzes::save_quiz(&ctx, common::quiz_data(&class_id, &author_id, "Rounds"))
            .await
            .expect("save quiz");

        let listed = |summaries: Vec<careclass_core::schemas::quiz::QuizSummary>| {
            summaries.into_iter().find(|summary| summary.id == quiz.id)
        };
        let entry = listed(quizzes::get_all_quizzes(&ctx, false).await.expect("listing"))
            .expect("quiz listed");
        assert_eq!(entry.question_count, 2, "backend {name}");
        assert_eq!(entry.pending_review_count, 0);

        let saved = quiz_submissions::save_quiz_submission(
            &ctx,
            QuizSubmissionData {
                quiz_id: quiz.id.clone(),
                student_id: student_id.clone(),
                answers: serde_json::json!({ "q0": "rested" }),
                status: SubmissionStatus::Submitted,
                student_comments: None,
            },
        )
        .await
        .expect("submit");
        let entry = listed(quizzes::get_all_quizzes(&ctx, false).await.expect("listing"))
            .expect("quiz listed");
        assert_eq!(entry.pending_review_count, 1);

        quiz_submissions::mark_as_reviewed(
            &ctx,
            &saved.id,
            ReviewData { teacher_comments: None, grade: Some(9.0) },
        )
        .await
        .expect("review");
        let entry = listed(quizzes::get_all_quizzes(&ctx, false).await.expect("listing"))
            .expect("quiz listed");
        assert_eq!(entry.pending_review_count, 0);

        stream::set_archived(&ctx, &quiz.stream_item_id, true).await.expect("archive");
        assert!(
            listed(quizzes::get_all_quizzes(&ctx, false).await.expect("listing")).is_none(),
            "backend {name}"
        );
        let entry = listed(quizzes::get_all_quizzes(&ctx, true).await.expect("full listing"))
            .expect("archived quiz still reachable on request");
        assert!(entry.archived);
    }
}

#[tokio::test]
async fn delete_removes_quiz_and_anchor() {
    for (name, ctx) in common::contexts().await {
        let class_id = common::seed_class(&ctx, "Music Hour").await;
        let author_id = common::seed_teacher(&ctx, "Remy Ost").await;

        let quiz = quizzes::save_quiz(&ctx, common::quiz_data(&class_id, &author_id, "Gone soon"))
            .await
            .expect("save quiz");
        quizzes::delete_quiz(&ctx, &quiz.id).await.expect("delete quiz");

        assert!(quizzes::get_quiz_by_stream_item_id(&ctx, &quiz.stream_item_id)
            .await
            .expect("fetch after delete")
            .is_none());
        assert!(stream::get_stream_item(&ctx, &quiz.stream_item_id)
            .await
            .expect("fetch item")
            .is_none());
        assert!(
            quizzes::get_quizzes_by_class(&ctx, &class_id, true)
                .await
                .expect("listing")
                .is_empty(),
            "backend {name}"
        );
    }
}
