mod common;

use careclass_core::db::types::Role;
use careclass_core::schemas::directory::UserData;
use careclass_core::services::{directory, quizzes};

#[tokio::test]
async fn assign_to_all_reaches_every_student() {
    for (name, ctx) in common::contexts().await {
        let class_id = common::seed_class(&ctx, "Open Session").await;
        let author_id = common::seed_teacher(&ctx, "Gus Lane").await;
        let student_id = common::seed_student(&ctx, "Vera Moss", None).await;

        let quiz = quizzes::save_quiz(&ctx, common::quiz_data(&class_id, &author_id, "For all"))
            .await
            .expect("save quiz");

        let visible =
            quizzes::get_quizzes_for_student(&ctx, &student_id).await.expect("student listing");
        assert!(visible.iter().any(|summary| summary.id == quiz.id), "backend {name}");
    }
}

#[tokio::test]
async fn targeted_quiz_respects_groups_and_individuals() {
    for (name, ctx) in common::contexts().await {
        let class_id = common::seed_class(&ctx, "Wing Session").await;
        let author_id = common::seed_teacher(&ctx, "Ida Rowe").await;
        let in_group = common::seed_student(&ctx, "Ana Wing", Some("wing-a")).await;
        let outsider = common::seed_student(&ctx, "Bo Other", Some("wing-b")).await;
        let picked = common::seed_student(&ctx, "Cy Pick", None).await;

        let mut data = common::quiz_data(&class_id, &author_id, "Wing A only");
        data.assign_to_all = false;
        data.assigned_groups = vec!["wing-a".to_string()];
        data.assigned_student_ids = vec![picked.clone()];
        let quiz = quizzes::save_quiz(&ctx, data).await.expect("save quiz");

        // The resolved selection covers the group member and the picked
        // student, deduplicated.
        assert_eq!(quiz.assigned_student_ids.len(), 2, "backend {name}");
        assert!(quiz.assigned_student_ids.contains(&in_group));
        assert!(quiz.assigned_student_ids.contains(&picked));

        let sees = |listing: Vec<careclass_core::schemas::quiz::QuizSummary>| {
            listing.iter().any(|summary| summary.id == quiz.id)
        };
        assert!(sees(quizzes::get_quizzes_for_student(&ctx, &in_group).await.expect("listing")));
        assert!(sees(quizzes::get_quizzes_for_student(&ctx, &picked).await.expect("listing")));
        assert!(!sees(quizzes::get_quizzes_for_student(&ctx, &outsider).await.expect("listing")));
    }
}

#[tokio::test]
async fn group_membership_is_evaluated_live() {
    for (name, ctx) in common::contexts().await {
        let class_id = common::seed_class(&ctx, "Late Joiners").await;
        let author_id = common::seed_teacher(&ctx, "Nel Frost").await;
        let student = directory::save_user(
            &ctx,
            UserData {
                id: None,
                email: "late.joiner@example.com".to_string(),
                full_name: "Late Joiner".to_string(),
                role: Role::Student,
                group_name: None,
            },
        )
        .await
        .expect("seed student");

        let mut data = common::quiz_data(&class_id, &author_id, "Wing C session");
        data.assign_to_all = false;
        data.assigned_groups = vec!["wing-c".to_string()];
        let quiz = quizzes::save_quiz(&ctx, data).await.expect("save quiz");

        let before =
            quizzes::get_quizzes_for_student(&ctx, &student.id).await.expect("listing");
        assert!(!before.iter().any(|summary| summary.id == quiz.id), "backend {name}");

        // Moving into the group makes the quiz visible without a re-save.
        directory::save_user(
            &ctx,
            UserData {
                id: Some(student.id.clone()),
                email: student.email.clone(),
                full_name: student.full_name.clone(),
                role: Role::Student,
                group_name: Some("wing-c".to_string()),
            },
        )
        .await
        .expect("move student");

        let after = quizzes::get_quizzes_for_student(&ctx, &student.id).await.expect("listing");
        assert!(after.iter().any(|summary| summary.id == quiz.id));
    }
}

#[tokio::test]
async fn archived_quizzes_are_hidden_from_students() {
    for (name, ctx) in common::contexts().await {
        let class_id = common::seed_class(&ctx, "Quiet Hour").await;
        let author_id = common::seed_teacher(&ctx, "Ora Dune").await;
        let student_id = common::seed_student(&ctx, "Fin Mild", None).await;

        let quiz = quizzes::save_quiz(&ctx, common::quiz_data(&class_id, &author_id, "Hidden"))
            .await
            .expect("save quiz");
        careclass_core::services::stream::set_archived(&ctx, &quiz.stream_item_id, true)
            .await
            .expect("archive");

        let listing =
            quizzes::get_quizzes_for_student(&ctx, &student_id).await.expect("listing");
        assert!(!listing.iter().any(|summary| summary.id == quiz.id), "backend {name}");
    }
}
