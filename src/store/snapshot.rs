use serde::{Deserialize, Serialize};

use crate::db::models::{
    Assignment, AssignmentStudent, AssignmentSubmission, Attachment, Class, Grade, Material, Quiz,
    QuizQuestion, QuizStudent, QuizSubmission, StreamItem, User,
};

/// The persisted snapshot: one object whose top-level keys are the collection
/// names, each an array of records. Unknown keys are ignored and missing keys
/// default to empty so older snapshots stay loadable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub users: Vec<User>,
    pub classes: Vec<Class>,
    pub stream_items: Vec<StreamItem>,
    pub quizzes: Vec<Quiz>,
    pub quiz_questions: Vec<QuizQuestion>,
    pub quiz_students: Vec<QuizStudent>,
    pub quiz_submissions: Vec<QuizSubmission>,
    pub assignments: Vec<Assignment>,
    pub assignment_students: Vec<AssignmentStudent>,
    pub assignment_submissions: Vec<AssignmentSubmission>,
    pub materials: Vec<Material>,
    pub attachments: Vec<Attachment>,
    pub grades: Vec<Grade>,
}

pub(crate) trait HasId {
    fn record_id(&self) -> &str;
}

macro_rules! impl_has_id {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HasId for $ty {
                fn record_id(&self) -> &str {
                    &self.id
                }
            }
        )*
    };
}

impl_has_id!(
    User,
    Class,
    StreamItem,
    Quiz,
    QuizQuestion,
    QuizStudent,
    QuizSubmission,
    Assignment,
    AssignmentStudent,
    AssignmentSubmission,
    Material,
    Attachment,
    Grade,
);

/// Replace an existing record by id in place, preserving its position, or
/// append when absent.
pub(crate) fn upsert_by_id<T: HasId>(items: &mut Vec<T>, record: T) {
    match items.iter_mut().find(|item| item.record_id() == record.record_id()) {
        Some(existing) => *existing = record,
        None => items.push(record),
    }
}

/// Remove by id; no-op when absent. Returns whether a record was removed.
pub(crate) fn remove_by_id<T: HasId>(items: &mut Vec<T>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.record_id() != id);
    items.len() != before
}
