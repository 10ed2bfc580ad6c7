use serde::{Deserialize, Serialize};
use sqlx::Type;

// String-typed enums without a database-specific type name, so the same
// derive maps to TEXT columns on Postgres and SQLite alike.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
    Parent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum StreamKind {
    Assignment,
    Quiz,
    Material,
    Announcement,
}

/// Lifecycle states of a student's submitted work, ordered. `Reviewed` is
/// terminal; grading is an independent designation expressed through the
/// `grade` field from `Submitted` onward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Draft,
    Submitted,
    ToReview,
    Reviewed,
}

impl SubmissionStatus {
    pub(crate) fn rank(self) -> u8 {
        match self {
            SubmissionStatus::Draft => 0,
            SubmissionStatus::Submitted => 1,
            SubmissionStatus::ToReview => 2,
            SubmissionStatus::Reviewed => 3,
        }
    }

    /// Counts against a quiz's pending-review total.
    pub(crate) fn awaits_review(self) -> bool {
        matches!(self, SubmissionStatus::Submitted | SubmissionStatus::ToReview)
    }
}
