pub mod json;
pub mod local;
pub mod remote;
pub(crate) mod sql;

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::config::{BackendKind, Settings};
use crate::db::models::{
    Assignment, AssignmentStudent, AssignmentSubmission, Attachment, Class, Grade, Material, Quiz,
    QuizQuestion, QuizStudent, QuizSubmission, StreamItem, User,
};
use crate::error::StoreError;

/// Uniform per-entity contract implemented by every adapter: save (upsert),
/// get-by-key, list-by-relation, delete. The adapters differ only in where
/// data lives and how relations are joined; they must produce identically
/// shaped output and translate storage failures into `StoreError` before
/// anything crosses this boundary.

#[async_trait]
pub trait DirectoryStore {
    async fn save_user(&self, user: &User) -> Result<(), StoreError>;
    async fn user_by_id(&self, id: &str) -> Result<Option<User>, StoreError>;
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
    async fn users_in_group(&self, group: &str) -> Result<Vec<User>, StoreError>;
    async fn delete_user(&self, id: &str) -> Result<(), StoreError>;

    async fn save_class(&self, class: &Class) -> Result<(), StoreError>;
    async fn class_by_id(&self, id: &str) -> Result<Option<Class>, StoreError>;
    async fn list_classes(&self) -> Result<Vec<Class>, StoreError>;
    async fn delete_class(&self, id: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait StreamStore {
    async fn save_stream_item(&self, item: &StreamItem) -> Result<(), StoreError>;
    async fn stream_item_by_id(&self, id: &str) -> Result<Option<StreamItem>, StoreError>;
    async fn stream_items_by_class(&self, class_id: &str) -> Result<Vec<StreamItem>, StoreError>;
    /// NotFound when no such item exists.
    async fn set_stream_item_archived(&self, id: &str, archived: bool) -> Result<(), StoreError>;
    async fn delete_stream_item(&self, id: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait QuizStore {
    /// Upsert the quiz scalars and replace all of its questions and student
    /// assignments in one atomic operation, so no reader observes a quiz with
    /// zero questions mid-update.
    async fn save_quiz(
        &self,
        quiz: &Quiz,
        questions: &[QuizQuestion],
        students: &[QuizStudent],
    ) -> Result<(), StoreError>;
    async fn quiz_by_id(&self, id: &str) -> Result<Option<Quiz>, StoreError>;
    async fn quiz_by_stream_item(&self, stream_item_id: &str)
        -> Result<Option<Quiz>, StoreError>;
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, StoreError>;
    /// Ordered by `order_index`.
    async fn questions_by_quiz(&self, quiz_id: &str) -> Result<Vec<QuizQuestion>, StoreError>;
    async fn quiz_students_by_quiz(&self, quiz_id: &str) -> Result<Vec<QuizStudent>, StoreError>;
    async fn quiz_ids_for_student(&self, student_id: &str) -> Result<Vec<String>, StoreError>;
    async fn delete_quiz(&self, id: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait QuizSubmissionStore {
    /// Upsert keyed on `(quiz_id, student_id)`: at most one row per pair. An
    /// existing row keeps its id and `created_at`.
    async fn upsert_quiz_submission(&self, submission: &QuizSubmission) -> Result<(), StoreError>;
    async fn quiz_submission_by_id(&self, id: &str)
        -> Result<Option<QuizSubmission>, StoreError>;
    async fn quiz_submission_for_student(
        &self,
        quiz_id: &str,
        student_id: &str,
    ) -> Result<Option<QuizSubmission>, StoreError>;
    async fn quiz_submissions_by_quiz(
        &self,
        quiz_id: &str,
    ) -> Result<Vec<QuizSubmission>, StoreError>;
    async fn delete_quiz_submission(&self, id: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait AssignmentStore {
    async fn save_assignment(
        &self,
        assignment: &Assignment,
        students: &[AssignmentStudent],
    ) -> Result<(), StoreError>;
    async fn assignment_by_id(&self, id: &str) -> Result<Option<Assignment>, StoreError>;
    async fn assignment_by_stream_item(
        &self,
        stream_item_id: &str,
    ) -> Result<Option<Assignment>, StoreError>;
    async fn list_assignments(&self) -> Result<Vec<Assignment>, StoreError>;
    async fn assignment_students_by_assignment(
        &self,
        assignment_id: &str,
    ) -> Result<Vec<AssignmentStudent>, StoreError>;
    async fn assignment_ids_for_student(
        &self,
        student_id: &str,
    ) -> Result<Vec<String>, StoreError>;
    async fn delete_assignment(&self, id: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait AssignmentSubmissionStore {
    async fn upsert_assignment_submission(
        &self,
        submission: &AssignmentSubmission,
    ) -> Result<(), StoreError>;
    async fn assignment_submission_by_id(
        &self,
        id: &str,
    ) -> Result<Option<AssignmentSubmission>, StoreError>;
    async fn assignment_submission_for_student(
        &self,
        assignment_id: &str,
        student_id: &str,
    ) -> Result<Option<AssignmentSubmission>, StoreError>;
    async fn assignment_submissions_by_assignment(
        &self,
        assignment_id: &str,
    ) -> Result<Vec<AssignmentSubmission>, StoreError>;
    async fn delete_assignment_submission(&self, id: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait MaterialStore {
    /// Upsert the material and replace its attachments atomically.
    async fn save_material(
        &self,
        material: &Material,
        attachments: &[Attachment],
    ) -> Result<(), StoreError>;
    async fn material_by_id(&self, id: &str) -> Result<Option<Material>, StoreError>;
    async fn material_by_stream_item(
        &self,
        stream_item_id: &str,
    ) -> Result<Option<Material>, StoreError>;
    async fn list_materials(&self) -> Result<Vec<Material>, StoreError>;
    /// Ordered by `order_index`.
    async fn attachments_by_material(
        &self,
        material_id: &str,
    ) -> Result<Vec<Attachment>, StoreError>;
    async fn delete_material(&self, id: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait GradeStore {
    /// Upsert keyed on `(stream_item_id, student_id)`.
    async fn upsert_grade(&self, grade: &Grade) -> Result<(), StoreError>;
    async fn grades_for_student(&self, student_id: &str) -> Result<Vec<Grade>, StoreError>;
    async fn grades_for_class(&self, class_id: &str) -> Result<Vec<Grade>, StoreError>;
    async fn delete_grade(&self, id: &str) -> Result<(), StoreError>;
}

pub trait Backend:
    DirectoryStore
    + StreamStore
    + QuizStore
    + QuizSubmissionStore
    + AssignmentStore
    + AssignmentSubmissionStore
    + MaterialStore
    + GradeStore
    + Send
    + Sync
{
}

impl<T> Backend for T where
    T: DirectoryStore
        + StreamStore
        + QuizStore
        + QuizSubmissionStore
        + AssignmentStore
        + AssignmentSubmissionStore
        + MaterialStore
        + GradeStore
        + Send
        + Sync
{
}

/// Construct the adapter the settings select. Called once at startup; the
/// returned handle is the only place backend selection is visible.
pub async fn for_settings(settings: &Settings) -> anyhow::Result<Arc<dyn Backend>> {
    match settings.backend_kind() {
        BackendKind::Remote => {
            let pool = crate::db::init_pg_pool(settings).await?;
            let backend = remote::RemoteBackend::new(pool);
            backend.ensure_schema().await?;
            Ok(Arc::new(backend))
        }
        BackendKind::Local => {
            let pool = crate::db::init_sqlite_pool(&settings.local_store().sqlite_path).await?;
            let backend = local::LocalBackend::new(pool);
            backend.ensure_schema().await?;
            Ok(Arc::new(backend))
        }
        BackendKind::Json => {
            let store = crate::store::EntityStore::from_settings(settings);
            store.initialize().await?;
            Ok(Arc::new(json::JsonBackend::new(store)))
        }
    }
}
