use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;
use validator::Validate;

/// Assignment save payload; structurally the quiz payload without questions.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentData {
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
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentView {
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
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentSummary {
    pub id: String,
    pub stream_item_id: String,
    pub class_id: String,
    pub class_title: Option<String>,
    pub author_name: Option<String>,
    pub title: String,
    pub points: f64,
    pub due_at: Option<String>,
    pub pending_review_count: usize,
    pub archived: bool,
}
