#![allow(dead_code)]

use std::sync::Arc;

use careclass_core::backend::json::JsonBackend;
use careclass_core::backend::local::LocalBackend;
use careclass_core::backend::remote::RemoteBackend;
use careclass_core::core::config::Settings;
use careclass_core::core::context::AppContext;
use careclass_core::db;
use careclass_core::db::types::Role;
use careclass_core::schemas::directory::{ClassData, UserData};
use careclass_core::schemas::quiz::{QuestionData, QuizData};
use careclass_core::services::directory;
use careclass_core::store::EntityStore;

fn settings() -> Settings {
    Settings::load().expect("test settings")
}

pub async fn json_ctx() -> AppContext {
    let store = EntityStore::in_memory();
    store.initialize().await.expect("initialize store");
    AppContext::new(settings(), Arc::new(JsonBackend::new(store)))
}

pub async fn sqlite_ctx() -> AppContext {
    let pool = db::init_sqlite_pool(":memory:").await.expect("sqlite pool");
    let backend = LocalBackend::new(pool);
    backend.ensure_schema().await.expect("sqlite schema");
    AppContext::new(settings(), Arc::new(backend))
}

/// Every backend the suite can reach: JSON and SQLite always, Postgres only
/// when `CARECLASS_TEST_DATABASE_URL` points at a reachable server.
pub async fn contexts() -> Vec<(&'static str, AppContext)> {
    let mut contexts = vec![("json", json_ctx().await), ("sqlite", sqlite_ctx().await)];
    if let Ok(url) = std::env::var("CARECLASS_TEST_DATABASE_URL") {
        let pool = sqlx::PgPool::connect(&url).await.expect("postgres pool");
        let backend = RemoteBackend::new(pool);
        backend.ensure_schema().await.expect("postgres schema");
        contexts.push(("postgres", AppContext::new(settings(), Arc::new(backend))));
    }
    contexts
}

pub async fn seed_user(
    ctx: &AppContext,
    name: &str,
    role: Role,
    group: Option<&str>,
) -> String {
    directory::save_user(
        ctx,
        UserData {
            id: None,
            email: format!("{}@example.com", name.replace(' ', ".").to_lowercase()),
            full_name: name.to_string(),
            role,
            group_name: group.map(str::to_string),
        },
    )
    .await
    .expect("seed user")
    .id
}

pub async fn seed_student(ctx: &AppContext, name: &str, group: Option<&str>) -> String {
    seed_user(ctx, name, Role::Student, group).await
}

pub async fn seed_teacher(ctx: &AppContext, name: &str) -> String {
    seed_user(ctx, name, Role::Teacher, None).await
}

pub async fn seed_class(ctx: &AppContext, title: &str) -> String {
    directory::save_class(
        ctx,
        ClassData { id: None, title: title.to_string(), subject: None },
    )
    .await
    .expect("seed class")
    .id
}

pub fn quiz_data(class_id: &str, author_id: &str, title: &str) -> QuizData {
    QuizData {
        stream_item_id: None,
        class_id: class_id.to_string(),
        author_id: author_id.to_string(),
        title: title.to_string(),
        content: None,
        points: 10.0,
        due_at: None,
        description: Some("weekly check-in".to_string()),
        assign_to_all: true,
        assigned_groups: Vec::new(),
        assigned_student_ids: Vec::new(),
        questions: vec![
            QuestionData {
                title: "How are you feeling today?".to_string(),
                kind: "text".to_string(),
                required: true,
                points: 5.0,
                correct_answer: serde_json::Value::Null,
                options: serde_json::Value::Null,
            },
            QuestionData {
                title: "Pick your activity".to_string(),
                kind: "single_choice".to_string(),
                required: false,
                points: 5.0,
                correct_answer: serde_json::json!("garden"),
                options: serde_json::json!(["garden", "music", "crafts"]),
            },
        ],
    }
}
