mod common;

use careclass_core::db::types::SubmissionStatus;
use careclass_core::schemas::assignment::AssignmentData;
use careclass_core::schemas::submission::{AssignmentSubmissionData, ReviewData};
use careclass_core::services::{assignment_submissions, assignments, grades};
use careclass_core::StoreError;

fn assignment_data(class_id: &str, author_id: &str, title: &str) -> AssignmentData {
    AssignmentData {
        stream_item_id: None,
        class_id: class_id.to_string(),
        author_id: author_id.to_string(),
        title: title.to_string(),
        content: Some("Bring your notes".to_string()),
        points: 20.0,
        due_at: None,
        description: None,
        assign_to_all: true,
        assigned_groups: Vec::new(),
        assigned_student_ids: Vec::new(),
    }
}

fn submission(
    assignment_id: &str,
    student_id: &str,
    status: SubmissionStatus,
) -> AssignmentSubmissionData {
    AssignmentSubmissionData {
        assignment_id: assignment_id.to_string(),
        student_id: student_id.to_string(),
        answers: serde_json::json!({ "essay": "my week" }),
        status,
        student_comments: Some("done early".to_string()),
    }
}

#[tokio::test]
async fn assignment_round_trips_and_lists_by_class() {
    for (name, ctx) in common::contexts().await {
        let class_id = common::seed_class(&ctx, "Writing Circle").await;
        let author_id = common::seed_teacher(&ctx, "Una Pratt").await;

        let saved =
            assignments::save_assignment(&ctx, assignment_data(&class_id, &author_id, "Journal"))
                .await
                .expect("save assignment");

        let fetched = assignments::get_assignment_by_stream_item_id(&ctx, &saved.stream_item_id)
            .await
            .expect("fetch")
            .expect("present");
        assert_eq!(fetched.id, saved.id, "backend {name}");
        assert_eq!(fetched.points, 20.0);

        let listing = assignments::get_assignments_by_class(&ctx, &class_id, false)
            .await
            .expect("listing");
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].class_title.as_deref(), Some("Writing Circle"));
        assert_eq!(listing[0].author_name.as_deref(), Some("Una Pratt"));
    }
}

#[tokio::test]
async fn submission_lifecycle_mirrors_the_quiz_family() {
    for (name, ctx) in common::contexts().await {
        let class_id = common::seed_class(&ctx, "Story Time").await;
        let author_id = common::seed_teacher(&ctx, "Ray Voss").await;
        let student_id = common::seed_student(&ctx, "Kit Snow", None).await;
        let assignment =
            assignments::save_assignment(&ctx, assignment_data(&class_id, &author_id, "Chapter"))
                .await
                .expect("save assignment");

        let err = assignment_submissions::save_assignment_submission(
            &ctx,
            submission("no-such-assignment", &student_id, SubmissionStatus::Draft),
        )
        .await
        .expect_err("missing assignment must fail");
        assert!(matches!(err, StoreError::NotFound(_)), "backend {name}");

        let submitted = assignment_submissions::save_assignment_submission(
            &ctx,
            submission(&assignment.id, &student_id, SubmissionStatus::Submitted),
        )
        .await
        .expect("submit");
        assert!(submitted.submitted_at.is_some());

        // Stale draft save does not regress the status.
        let after = assignment_submissions::save_assignment_submission(
            &ctx,
            submission(&assignment.id, &student_id, SubmissionStatus::Draft),
        )
        .await
        .expect("late autosave");
        assert_eq!(after.status, SubmissionStatus::Submitted);
        assert_eq!(after.id, submitted.id);

        let reviewed = assignment_submissions::mark_as_reviewed(
            &ctx,
            &submitted.id,
            ReviewData { teacher_comments: Some("solid".to_string()), grade: Some(17.0) },
        )
        .await
        .expect("review");
        assert_eq!(reviewed.status, SubmissionStatus::Reviewed);
        assert_eq!(reviewed.grade, Some(17.0));

        let student_grades =
            grades::get_grades_for_student(&ctx, &student_id).await.expect("grades");
        assert!(student_grades
            .iter()
            .any(|g| g.stream_item_id == assignment.stream_item_id && g.value == 17.0));
    }
}

#[tokio::test]
async fn archived_assignments_are_hidden_from_the_global_listing() {
    for (name, ctx) in common::contexts().await {
        let class_id = common::seed_class(&ctx, "Evening Pages").await;
        let author_id = common::seed_teacher(&ctx, "Bea Toft").await;

        let assignment =
            assignments::save_assignment(&ctx, assignment_data(&class_id, &author_id, "Diary"))
                .await
                .expect("save assignment");
        careclass_core::services::stream::set_archived(&ctx, &assignment.stream_item_id, true)
            .await
            .expect("archive");

        let active = assignments::get_all_assignments(&ctx, false).await.expect("listing");
        assert!(
            !active.iter().any(|summary| summary.id == assignment.id),
            "backend {name}"
        );

        let all = assignments::get_all_assignments(&ctx, true).await.expect("full listing");
        assert!(all.iter().any(|summary| summary.id == assignment.id && summary.archived));
    }
}

#[tokio::test]
async fn targeted_assignment_resolves_group_members() {
    for (name, ctx) in common::contexts().await {
        let class_id = common::seed_class(&ctx, "Wing Reading").await;
        let author_id = common::seed_teacher(&ctx, "Hal Crane").await;
        let member = common::seed_student(&ctx, "May Reed", Some("wing-d")).await;
        let outsider = common::seed_student(&ctx, "Ned Hart", None).await;

        let mut data = assignment_data(&class_id, &author_id, "Wing D reading");
        data.assign_to_all = false;
        data.assigned_groups = vec!["wing-d".to_string()];
        let assignment = assignments::save_assignment(&ctx, data).await.expect("save");

        assert_eq!(assignment.assigned_student_ids, vec![member.clone()], "backend {name}");

        let member_view =
            assignments::get_assignments_for_student(&ctx, &member).await.expect("listing");
        assert!(member_view.iter().any(|summary| summary.id == assignment.id));
        let outsider_view =
            assignments::get_assignments_for_student(&ctx, &outsider).await.expect("listing");
        assert!(!outsider_view.iter().any(|summary| summary.id == assignment.id));
    }
}
