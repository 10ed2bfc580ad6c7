use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::db::types::SubmissionStatus;

/// Student-side save payload for a quiz submission. The requested status is a
/// floor, not an assignment: the stored status never moves backwards, so a
/// stale autosave cannot un-submit work.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuizSubmissionData {
    pub quiz_id: String,
    pub student_id: String,
    #[serde(default)]
    pub answers: Value,
    pub status: SubmissionStatus,
    #[serde(default)]
    pub student_comments: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentSubmissionData {
    pub assignment_id: String,
    pub student_id: String,
    #[serde(default)]
    pub answers: Value,
    pub status: SubmissionStatus,
    #[serde(default)]
    pub student_comments: Option<String>,
}

/// Reviewer payload for the terminal transition. The grade is optional;
/// review and grading are independent designations.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReviewData {
    #[serde(default)]
    pub teacher_comments: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "grade must be non-negative"))]
    pub grade: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSubmissionView {
    pub id: String,
    pub quiz_id: String,
    pub student_id: String,
    pub answers: Value,
    pub status: SubmissionStatus,
    pub grade: Option<f64>,
    pub student_comments: Option<String>,
    pub teacher_comments: Option<String>,
    pub submitted_at: Option<String>,
    pub reviewed_at: Option<String>,
    pub graded_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Row on the grades surface; one per (stream item, student).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeView {
    pub id: String,
    pub stream_item_id: String,
    pub student_id: String,
    pub value: f64,
    pub graded_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentSubmissionView {
    pub id: String,
    pub assignment_id: String,
    pub student_id: String,
    pub answers: Value,
    pub status: SubmissionStatus,
    pub grade: Option<f64>,
    pub student_comments: Option<String>,
    pub teacher_comments: Option<String>,
    pub submitted_at: Option<String>,
    pub reviewed_at: Option<String>,
    pub graded_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}
