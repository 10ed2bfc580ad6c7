use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::{Role, StreamKind, SubmissionStatus};

// Records serialize with camelCase keys; that spelling is the persisted
// snapshot format of the JSON backend. The SQL backends map the snake_case
// field names to their columns via FromRow.

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub group_name: Option<String>,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: String,
    pub title: String,
    pub subject: Option<String>,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

/// The anchor record a quiz, assignment or material attaches to one-to-one.
/// Archiving hides the attached item from active listings without touching
/// submission history.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StreamItem {
    pub id: String,
    pub class_id: String,
    pub author_id: String,
    pub kind: StreamKind,
    pub title: String,
    pub content: Option<String>,
    pub archived: bool,
    pub created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub stream_item_id: String,
    pub points: f64,
    pub due_at: Option<PrimitiveDateTime>,
    pub description: Option<String>,
    pub assign_to_all: bool,
    pub assigned_groups: Json<Vec<String>>,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub quiz_id: String,
    pub title: String,
    pub kind: String,
    pub required: bool,
    pub points: f64,
    pub correct_answer: Json<serde_json::Value>,
    pub options: Json<serde_json::Value>,
    /// Dense, zero-based; defines both display and grading order.
    pub order_index: i32,
}

/// Individual student assignment, used only when `assign_to_all` is false and
/// the student was picked directly rather than through a group.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QuizStudent {
    pub id: String,
    pub quiz_id: String,
    pub student_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QuizSubmission {
    pub id: String,
    pub quiz_id: String,
    pub student_id: String,
    pub answers: Json<serde_json::Value>,
    pub status: SubmissionStatus,
    pub grade: Option<f64>,
    pub student_comments: Option<String>,
    pub teacher_comments: Option<String>,
    pub submitted_at: Option<PrimitiveDateTime>,
    pub reviewed_at: Option<PrimitiveDateTime>,
    pub graded_at: Option<PrimitiveDateTime>,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub stream_item_id: String,
    pub points: f64,
    pub due_at: Option<PrimitiveDateTime>,
    pub description: Option<String>,
    pub assign_to_all: bool,
    pub assigned_groups: Json<Vec<String>>,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentStudent {
    pub id: String,
    pub assignment_id: String,
    pub student_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentSubmission {
    pub id: String,
    pub assignment_id: String,
    pub student_id: String,
    pub answers: Json<serde_json::Value>,
    pub status: SubmissionStatus,
    pub grade: Option<f64>,
    pub student_comments: Option<String>,
    pub teacher_comments: Option<String>,
    pub submitted_at: Option<PrimitiveDateTime>,
    pub reviewed_at: Option<PrimitiveDateTime>,
    pub graded_at: Option<PrimitiveDateTime>,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: String,
    pub stream_item_id: String,
    pub description: Option<String>,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub material_id: String,
    pub title: String,
    pub url: String,
    pub kind: String,
    pub order_index: i32,
}

/// One grade per (stream item, student); written when a review attaches a
/// grade to a quiz or assignment submission.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: String,
    pub stream_item_id: String,
    pub student_id: String,
    pub value: f64,
    pub graded_at: PrimitiveDateTime,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}
