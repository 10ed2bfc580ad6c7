mod common;

use careclass_core::schemas::material::{AttachmentData, MaterialData};
use careclass_core::services::{materials, stream};

fn material_data(class_id: &str, author_id: &str, title: &str) -> MaterialData {
    MaterialData {
        stream_item_id: None,
        class_id: class_id.to_string(),
        author_id: author_id.to_string(),
        title: title.to_string(),
        content: None,
        description: Some("Weekly handouts".to_string()),
        attachments: vec![
            AttachmentData {
                title: "Schedule".to_string(),
                url: "https://files.example.com/schedule.pdf".to_string(),
                kind: "pdf".to_string(),
            },
            AttachmentData {
                title: "Song sheet".to_string(),
                url: "https://files.example.com/songs.pdf".to_string(),
                kind: "pdf".to_string(),
            },
        ],
    }
}

#[tokio::test]
async fn material_round_trips_with_ordered_attachments() {
    for (name, ctx) in common::contexts().await {
        let class_id = common::seed_class(&ctx, "Resources").await;
        let author_id = common::seed_teacher(&ctx, "Eve Lark").await;

        let saved =
            materials::save_material(&ctx, material_data(&class_id, &author_id, "Handouts"))
                .await
                .expect("save material");
        assert_eq!(saved.attachments.len(), 2, "backend {name}");

        let fetched = materials::get_material_by_stream_item_id(&ctx, &saved.stream_item_id)
            .await
            .expect("fetch")
            .expect("present");
        assert_eq!(fetched.attachments[0].title, "Schedule");
        assert_eq!(fetched.attachments[0].order_index, 0);
        assert_eq!(fetched.attachments[1].title, "Song sheet");
        assert_eq!(fetched.attachments[1].order_index, 1);
    }
}

#[tokio::test]
async fn update_replaces_the_attachment_list() {
    for (name, ctx) in common::contexts().await {
        let class_id = common::seed_class(&ctx, "Library").await;
        let author_id = common::seed_teacher(&ctx, "Ash Dorn").await;

        let first = materials::save_material(&ctx, material_data(&class_id, &author_id, "Pack"))
            .await
            .expect("save material");

        let mut update = material_data(&class_id, &author_id, "Pack v2");
        update.stream_item_id = Some(first.stream_item_id.clone());
        update.attachments = vec![AttachmentData {
            title: "Replacement".to_string(),
            url: "https://files.example.com/replacement.pdf".to_string(),
            kind: "pdf".to_string(),
        }];
        let second = materials::save_material(&ctx, update).await.expect("update material");

        assert_eq!(second.id, first.id, "backend {name}");
        assert_eq!(second.attachments.len(), 1);
        assert_eq!(second.attachments[0].title, "Replacement");

        let fetched = materials::get_material_by_stream_item_id(&ctx, &first.stream_item_id)
            .await
            .expect("fetch")
            .expect("present");
        assert_eq!(fetched.attachments.len(), 1);
    }
}

#[tokio::test]
async fn archived_materials_are_hidden_from_class_listings() {
    for (name, ctx) in common::contexts().await {
        let class_id = common::seed_class(&ctx, "Archive Test").await;
        let author_id = common::seed_teacher(&ctx, "Kip Vance").await;

        let material =
            materials::save_material(&ctx, material_data(&class_id, &author_id, "Old pack"))
                .await
                .expect("save material");
        stream::set_archived(&ctx, &material.stream_item_id, true).await.expect("archive");

        let active = materials::get_materials_by_class(&ctx, &class_id, false)
            .await
            .expect("active listing");
        assert!(active.is_empty(), "backend {name}");

        let all = materials::get_materials_by_class(&ctx, &class_id, true)
            .await
            .expect("full listing");
        assert_eq!(all.len(), 1);
        assert!(all[0].archived);

        // The global listing applies the same default.
        let global = materials::get_all_materials(&ctx, false).await.expect("global listing");
        assert!(!global.iter().any(|view| view.id == material.id));
        let global = materials::get_all_materials(&ctx, true).await.expect("full global");
        assert!(global.iter().any(|view| view.id == material.id && view.archived));
    }
}

#[tokio::test]
async fn delete_removes_material_and_anchor() {
    for (name, ctx) in common::contexts().await {
        let class_id = common::seed_class(&ctx, "Cleanup").await;
        let author_id = common::seed_teacher(&ctx, "Dot Marsh").await;

        let material =
            materials::save_material(&ctx, material_data(&class_id, &author_id, "Ephemeral"))
                .await
                .expect("save material");
        materials::delete_material(&ctx, &material.id).await.expect("delete");

        assert!(materials::get_material_by_stream_item_id(&ctx, &material.stream_item_id)
            .await
            .expect("fetch after delete")
            .is_none());
        assert!(
            stream::get_stream_item(&ctx, &material.stream_item_id)
                .await
                .expect("fetch item")
                .is_none(),
            "backend {name}"
        );
    }
}
