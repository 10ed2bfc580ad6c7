use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::PrimitiveDateTime;
use validator::Validate;

/// Quiz save payload. `stream_item_id` selects the quiz to update; when absent
/// a new stream item and quiz are created. Questions and the student selection
/// are authoritative: the stored children are replaced with what is sent.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuizData {
    #[serde(default)]
    pub stream_item_id: Option<String>,
    pub class_id: String,
    pub author_id: String,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[validate(range(min = 0.0, message = "points must be non-negative"))]
    pub points: f64,
    #[serde(default)]
    pub due_at: Option<PrimitiveDateTime>,
    #[serde(default)]
    pub description: Option<String>,
    pub assign_to_all: bool,
    #[serde(default)]
    pub assigned_groups: Vec<String>,
    #[serde(default)]
    pub assigned_student_ids: Vec<String>,
    #[validate(nested)]
    pub questions: Vec<QuestionData>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionData {
    #[validate(length(min = 1, message = "question title must not be empty"))]
    pub title: String,
    pub kind: String,
    #[serde(default)]
    pub required: bool,
    #[validate(range(min = 0.0, message = "question points must be non-negative"))]
    pub points: f64,
    #[serde(default)]
    pub correct_answer: Value,
    #[serde(default)]
    pub options: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizView {
    pub id: String,
    pub stream_item_id: String,
    pub class_id: String,
    pub author_id: String,
    pub title: String,
    pub content: Option<String>,
    pub archived: bool,
    pub points: f64,
    pub due_at: Option<String>,
    pub description: Option<String>,
    pub assign_to_all: bool,
    pub assigned_groups: Vec<String>,
    pub assigned_student_ids: Vec<String>,
    pub questions: Vec<QuestionView>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: String,
    pub title: String,
    pub kind: String,
    pub required: bool,
    pub points: f64,
    pub correct_answer: Value,
    pub options: Value,
    pub order_index: i32,
}

/// Listing row: the quiz plus the display fields the card UIs need, resolved
/// once in the service so every backend returns the same shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub id: String,
    pub stream_item_id: String,
    pub class_id: String,
    pub class_title: Option<String>,
    pub author_name: Option<String>,
    pub title: String,
    pub points: f64,
    pub due_at: Option<String>,
    pub question_count: usize,
    pub pending_review_count: usize,
    pub archived: bool,
}
