use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::backend::sql;
use crate::backend::{
    AssignmentStore, AssignmentSubmissionStore, DirectoryStore, GradeStore, MaterialStore,
    QuizStore, QuizSubmissionStore, StreamStore,
};
use crate::db::models::{
    Assignment, AssignmentStudent, AssignmentSubmission, Attachment, Class, Grade, Material, Quiz,
    QuizQuestion, QuizStudent, QuizSubmission, StreamItem, User,
};
use crate::error::StoreError;

const USER_COLUMNS: &str = "id, email, full_name, role, group_name, created_at, updated_at";
const CLASS_COLUMNS: &str = "id, title, subject, created_at, updated_at";
const STREAM_ITEM_COLUMNS: &str =
    "id, class_id, author_id, kind, title, content, archived, created_at";
const QUIZ_COLUMNS: &str = "\
    id, stream_item_id, points, due_at, description, assign_to_all, assigned_groups, \
    created_at, updated_at";
const QUESTION_COLUMNS: &str =
    "id, quiz_id, title, kind, required, points, correct_answer, options, order_index";
const QUIZ_SUBMISSION_COLUMNS: &str = "\
    id, quiz_id, student_id, answers, status, grade, student_comments, teacher_comments, \
    submitted_at, reviewed_at, graded_at, created_at, updated_at";
const ASSIGNMENT_COLUMNS: &str = "\
    id, stream_item_id, points, due_at, description, assign_to_all, assigned_groups, \
    created_at, updated_at";
const ASSIGNMENT_SUBMISSION_COLUMNS: &str = "\
    id, assignment_id, student_id, answers, status, grade, student_comments, teacher_comments, \
    submitted_at, reviewed_at, graded_at, created_at, updated_at";
const MATERIAL_COLUMNS: &str = "id, stream_item_id, description, created_at, updated_at";
const ATTACHMENT_COLUMNS: &str = "id, material_id, title, url, kind, order_index";
const GRADE_COLUMNS: &str =
    "id, stream_item_id, student_id, value, graded_at, created_at, updated_at";

// SQLite renders the same logical schema with its own storage classes:
// REAL for points and grades, TEXT for datetimes and serialized JSON.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        email TEXT NOT NULL,
        full_name TEXT NOT NULL,
        role TEXT NOT NULL,
        group_name TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS classes (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        subject TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS stream_items (
        id TEXT PRIMARY KEY,
        class_id TEXT NOT NULL,
        author_id TEXT NOT NULL,
        kind TEXT NOT NULL,
        title TEXT NOT NULL,
        content TEXT,
        archived BOOLEAN NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS quizzes (
        id TEXT PRIMARY KEY,
        stream_item_id TEXT NOT NULL UNIQUE,
        points REAL NOT NULL,
        due_at TEXT,
        description TEXT,
        assign_to_all BOOLEAN NOT NULL,
        assigned_groups TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS quiz_questions (
        id TEXT PRIMARY KEY,
        quiz_id TEXT NOT NULL,
        title TEXT NOT NULL,
        kind TEXT NOT NULL,
        required BOOLEAN NOT NULL,
        points REAL NOT NULL,
        correct_answer TEXT NOT NULL,
        options TEXT NOT NULL,
        order_index INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS quiz_students (
        id TEXT PRIMARY KEY,
        quiz_id TEXT NOT NULL,
        student_id TEXT NOT NULL,
        UNIQUE (quiz_id, student_id)
    )",
    "CREATE TABLE IF NOT EXISTS quiz_submissions (
        id TEXT PRIMARY KEY,
        quiz_id TEXT NOT NULL,
        student_id TEXT NOT NULL,
        answers TEXT NOT NULL,
        status TEXT NOT NULL,
        grade REAL,
        student_comments TEXT,
        teacher_comments TEXT,
        submitted_at TEXT,
        reviewed_at TEXT,
        graded_at TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE (quiz_id, student_id)
    )",
    "CREATE TABLE IF NOT EXISTS assignments (
        id TEXT PRIMARY KEY,
        stream_item_id TEXT NOT NULL UNIQUE,
        points REAL NOT NULL,
        due_at TEXT,
        description TEXT,
        assign_to_all BOOLEAN NOT NULL,
        assigned_groups TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS assignment_students (
        id TEXT PRIMARY KEY,
        assignment_id TEXT NOT NULL,
        student_id TEXT NOT NULL,
        UNIQUE (assignment_id, student_id)
    )",
    "CREATE TABLE IF NOT EXISTS assignment_submissions (
        id TEXT PRIMARY KEY,
        assignment_id TEXT NOT NULL,
        student_id TEXT NOT NULL,
        answers TEXT NOT NULL,
        status TEXT NOT NULL,
        grade REAL,
        student_comments TEXT,
        teacher_comments TEXT,
        submitted_at TEXT,
        reviewed_at TEXT,
        graded_at TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE (assignment_id, student_id)
    )",
    "CREATE TABLE IF NOT EXISTS materials (
        id TEXT PRIMARY KEY,
        stream_item_id TEXT NOT NULL UNIQUE,
        description TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS attachments (
        id TEXT PRIMARY KEY,
        material_id TEXT NOT NULL,
        title TEXT NOT NULL,
        url TEXT NOT NULL,
        kind TEXT NOT NULL,
        order_index INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS grades (
        id TEXT PRIMARY KEY,
        stream_item_id TEXT NOT NULL,
        student_id TEXT NOT NULL,
        value REAL NOT NULL,
        graded_at TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE (stream_item_id, student_id)
    )",
];

/// Adapter over an embedded SQLite file (or `:memory:` in tests). Reuses the
/// remote adapter's DML; where the remote side joins, this one does the
/// lookup in two steps to keep the statements simple.
pub struct LocalBackend {
    pool: SqlitePool,
}

impl LocalBackend {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|err| StoreError::from_sqlx(err, "ensure schema"))?;
        }
        Ok(())
    }
}

#[async_trait]
impl DirectoryStore for LocalBackend {
    async fn save_user(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(sql::UPSERT_USER)
            .bind(&user.id)
            .bind(&user.email)
            .bind(&user.full_name)
            .bind(user.role)
            .bind(&user.group_name)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "save user"))?;
        Ok(())
    }

    async fn user_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "load user"))
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users"))
            .fetch_all(&self.pool)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "list users"))
    }

    async fn users_in_group(&self, group: &str) -> Result<Vec<User>, StoreError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE group_name = $1"
        ))
        .bind(group)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| StoreError::from_sqlx(err, "list users in group"))
    }

    async fn delete_user(&self, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "delete user"))?;
        Ok(())
    }

    async fn save_class(&self, class: &Class) -> Result<(), StoreError> {
        sqlx::query(sql::UPSERT_CLASS)
            .bind(&class.id)
            .bind(&class.title)
            .bind(&class.subject)
            .bind(class.created_at)
            .bind(class.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "save class"))?;
        Ok(())
    }

    async fn class_by_id(&self, id: &str) -> Result<Option<Class>, StoreError> {
        sqlx::query_as::<_, Class>(&format!("SELECT {CLASS_COLUMNS} FROM classes WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "load class"))
    }

    async fn list_classes(&self) -> Result<Vec<Class>, StoreError> {
        sqlx::query_as::<_, Class>(&format!("SELECT {CLASS_COLUMNS} FROM classes"))
            .fetch_all(&self.pool)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "list classes"))
    }

    async fn delete_class(&self, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM classes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "delete class"))?;
        Ok(())
    }
}

#[async_trait]
impl StreamStore for LocalBackend {
    async fn save_stream_item(&self, item: &StreamItem) -> Result<(), StoreError> {
        sqlx::query(sql::UPSERT_STREAM_ITEM)
            .bind(&item.id)
            .bind(&item.class_id)
            .bind(&item.author_id)
            .bind(item.kind)
            .bind(&item.title)
            .bind(&item.content)
            .bind(item.archived)
            .bind(item.created_at)
            .execute(&self.pool)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "save stream item"))?;
        Ok(())
    }

    async fn stream_item_by_id(&self, id: &str) -> Result<Option<StreamItem>, StoreError> {
        sqlx::query_as::<_, StreamItem>(&format!(
            "SELECT {STREAM_ITEM_COLUMNS} FROM stream_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StoreError::from_sqlx(err, "load stream item"))
    }

    async fn stream_items_by_class(&self, class_id: &str) -> Result<Vec<StreamItem>, StoreError> {
        sqlx::query_as::<_, StreamItem>(&format!(
            "SELECT {STREAM_ITEM_COLUMNS} FROM stream_items WHERE class_id = $1"
        ))
        .bind(class_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| StoreError::from_sqlx(err, "list stream items"))
    }

    async fn set_stream_item_archived(&self, id: &str, archived: bool) -> Result<(), StoreError> {
        let updated = sqlx::query("UPDATE stream_items SET archived = $1 WHERE id = $2")
            .bind(archived)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "archive stream item"))?;
        if updated.rows_affected() == 0 {
            return Err(StoreError::not_found(format!("stream item {id}")));
        }
        Ok(())
    }

    async fn delete_stream_item(&self, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM stream_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "delete stream item"))?;
        Ok(())
    }
}

#[async_trait]
impl QuizStore for LocalBackend {
    async fn save_quiz(
        &self,
        quiz: &Quiz,
        questions: &[QuizQuestion],
        students: &[QuizStudent],
    ) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| StoreError::from_sqlx(err, "begin quiz save"))?;

        sqlx::query(sql::UPSERT_QUIZ)
            .bind(&quiz.id)
            .bind(&quiz.stream_item_id)
            .bind(quiz.points)
            .bind(quiz.due_at)
            .bind(&quiz.description)
            .bind(quiz.assign_to_all)
            .bind(&quiz.assigned_groups)
            .bind(quiz.created_at)
            .bind(quiz.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "save quiz"))?;

        sqlx::query("DELETE FROM quiz_questions WHERE quiz_id = $1")
            .bind(&quiz.id)
            .execute(&mut *tx)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "clear quiz questions"))?;
        for question in questions {
            sqlx::query(sql::INSERT_QUIZ_QUESTION)
                .bind(&question.id)
                .bind(&question.quiz_id)
                .bind(&question.title)
                .bind(&question.kind)
                .bind(question.required)
                .bind(question.points)
                .bind(&question.correct_answer)
                .bind(&question.options)
                .bind(question.order_index)
                .execute(&mut *tx)
                .await
                .map_err(|err| StoreError::from_sqlx(err, "insert quiz question"))?;
        }

        sqlx::query("DELETE FROM quiz_students WHERE quiz_id = $1")
            .bind(&quiz.id)
            .execute(&mut *tx)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "clear quiz students"))?;
        for student in students {
            sqlx::query(sql::INSERT_QUIZ_STUDENT)
                .bind(&student.id)
                .bind(&student.quiz_id)
                .bind(&student.student_id)
                .execute(&mut *tx)
                .await
                .map_err(|err| StoreError::from_sqlx(err, "insert quiz student"))?;
        }

        tx.commit().await.map_err(|err| StoreError::from_sqlx(err, "commit quiz save"))?;
        Ok(())
    }

    async fn quiz_by_id(&self, id: &str) -> Result<Option<Quiz>, StoreError> {
        sqlx::query_as::<_, Quiz>(&format!("SELECT {QUIZ_COLUMNS} FROM quizzes WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "load quiz"))
    }

    async fn quiz_by_stream_item(
        &self,
        stream_item_id: &str,
    ) -> Result<Option<Quiz>, StoreError> {
        sqlx::query_as::<_, Quiz>(&format!(
            "SELECT {QUIZ_COLUMNS} FROM quizzes WHERE stream_item_id = $1"
        ))
        .bind(stream_item_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StoreError::from_sqlx(err, "load quiz by stream item"))
    }

    async fn list_quizzes(&self) -> Result<Vec<Quiz>, StoreError> {
        sqlx::query_as::<_, Quiz>(&format!("SELECT {QUIZ_COLUMNS} FROM quizzes"))
            .fetch_all(&self.pool)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "list quizzes"))
    }

    async fn questions_by_quiz(&self, quiz_id: &str) -> Result<Vec<QuizQuestion>, StoreError> {
        sqlx::query_as::<_, QuizQuestion>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM quiz_questions WHERE quiz_id = $1 ORDER BY order_index"
        ))
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| StoreError::from_sqlx(err, "list quiz questions"))
    }

    async fn quiz_students_by_quiz(&self, quiz_id: &str) -> Result<Vec<QuizStudent>, StoreError> {
        sqlx::query_as::<_, QuizStudent>(
            "SELECT id, quiz_id, student_id FROM quiz_students WHERE quiz_id = $1",
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| StoreError::from_sqlx(err, "list quiz students"))
    }

    async fn quiz_ids_for_student(&self, student_id: &str) -> Result<Vec<String>, StoreError> {
        sqlx::query_scalar::<_, String>(
            "SELECT quiz_id FROM quiz_students WHERE student_id = $1",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| StoreError::from_sqlx(err, "list quiz ids for student"))
    }

    async fn delete_quiz(&self, id: &str) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| StoreError::from_sqlx(err, "begin quiz delete"))?;
        sqlx::query("DELETE FROM quiz_questions WHERE quiz_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "delete quiz questions"))?;
        sqlx::query("DELETE FROM quiz_students WHERE quiz_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "delete quiz students"))?;
        sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "delete quiz"))?;
        tx.commit().await.map_err(|err| StoreError::from_sqlx(err, "commit quiz delete"))?;
        Ok(())
    }
}

#[async_trait]
impl QuizSubmissionStore for LocalBackend {
    async fn upsert_quiz_submission(&self, submission: &QuizSubmission) -> Result<(), StoreError> {
        sqlx::query(sql::UPSERT_QUIZ_SUBMISSION)
            .bind(&submission.id)
            .bind(&submission.quiz_id)
            .bind(&submission.student_id)
            .bind(&submission.answers)
            .bind(submission.status)
            .bind(submission.grade)
            .bind(&submission.student_comments)
            .bind(&submission.teacher_comments)
            .bind(submission.submitted_at)
            .bind(submission.reviewed_at)
            .bind(submission.graded_at)
            .bind(submission.created_at)
            .bind(submission.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "upsert quiz submission"))?;
        Ok(())
    }

    async fn quiz_submission_by_id(
        &self,
        id: &str,
    ) -> Result<Option<QuizSubmission>, StoreError> {
        sqlx::query_as::<_, QuizSubmission>(&format!(
            "SELECT {QUIZ_SUBMISSION_COLUMNS} FROM quiz_submissions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StoreError::from_sqlx(err, "load quiz submission"))
    }

    async fn quiz_submission_for_student(
        &self,
        quiz_id: &str,
        student_id: &str,
    ) -> Result<Option<QuizSubmission>, StoreError> {
        sqlx::query_as::<_, QuizSubmission>(&format!(
            "SELECT {QUIZ_SUBMISSION_COLUMNS} FROM quiz_submissions \
             WHERE quiz_id = $1 AND student_id = $2"
        ))
        .bind(quiz_id)
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StoreError::from_sqlx(err, "load quiz submission for student"))
    }

    async fn quiz_submissions_by_quiz(
        &self,
        quiz_id: &str,
    ) -> Result<Vec<QuizSubmission>, StoreError> {
        sqlx::query_as::<_, QuizSubmission>(&format!(
            "SELECT {QUIZ_SUBMISSION_COLUMNS} FROM quiz_submissions WHERE quiz_id = $1"
        ))
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| StoreError::from_sqlx(err, "list quiz submissions"))
    }

    async fn delete_quiz_submission(&self, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM quiz_submissions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "delete quiz submission"))?;
        Ok(())
    }
}

#[async_trait]
impl AssignmentStore for LocalBackend {
    async fn save_assignment(
        &self,
        assignment: &Assignment,
        students: &[AssignmentStudent],
    ) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| StoreError::from_sqlx(err, "begin assignment save"))?;

        sqlx::query(sql::UPSERT_ASSIGNMENT)
            .bind(&assignment.id)
            .bind(&assignment.stream_item_id)
            .bind(assignment.points)
            .bind(assignment.due_at)
            .bind(&assignment.description)
            .bind(assignment.assign_to_all)
            .bind(&assignment.assigned_groups)
            .bind(assignment.created_at)
            .bind(assignment.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "save assignment"))?;

        sqlx::query("DELETE FROM assignment_students WHERE assignment_id = $1")
            .bind(&assignment.id)
            .execute(&mut *tx)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "clear assignment students"))?;
        for student in students {
            sqlx::query(sql::INSERT_ASSIGNMENT_STUDENT)
                .bind(&student.id)
                .bind(&student.assignment_id)
                .bind(&student.student_id)
                .execute(&mut *tx)
                .await
                .map_err(|err| StoreError::from_sqlx(err, "insert assignment student"))?;
        }

        tx.commit().await.map_err(|err| StoreError::from_sqlx(err, "commit assignment save"))?;
        Ok(())
    }

    async fn assignment_by_id(&self, id: &str) -> Result<Option<Assignment>, StoreError> {
        sqlx::query_as::<_, Assignment>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StoreError::from_sqlx(err, "load assignment"))
    }

    async fn assignment_by_stream_item(
        &self,
        stream_item_id: &str,
    ) -> Result<Option<Assignment>, StoreError> {
        sqlx::query_as::<_, Assignment>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE stream_item_id = $1"
        ))
        .bind(stream_item_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StoreError::from_sqlx(err, "load assignment by stream item"))
    }

    async fn list_assignments(&self) -> Result<Vec<Assignment>, StoreError> {
        sqlx::query_as::<_, Assignment>(&format!("SELECT {ASSIGNMENT_COLUMNS} FROM assignments"))
            .fetch_all(&self.pool)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "list assignments"))
    }

    async fn assignment_students_by_assignment(
        &self,
        assignment_id: &str,
    ) -> Result<Vec<AssignmentStudent>, StoreError> {
        sqlx::query_as::<_, AssignmentStudent>(
            "SELECT id, assignment_id, student_id FROM assignment_students \
             WHERE assignment_id = $1",
        )
        .bind(assignment_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| StoreError::from_sqlx(err, "list assignment students"))
    }

    async fn assignment_ids_for_student(
        &self,
        student_id: &str,
    ) -> Result<Vec<String>, StoreError> {
        sqlx::query_scalar::<_, String>(
            "SELECT assignment_id FROM assignment_students WHERE student_id = $1",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| StoreError::from_sqlx(err, "list assignment ids for student"))
    }

    async fn delete_assignment(&self, id: &str) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| StoreError::from_sqlx(err, "begin assignment delete"))?;
        sqlx::query("DELETE FROM assignment_students WHERE assignment_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "delete assignment students"))?;
        sqlx::query("DELETE FROM assignments WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "delete assignment"))?;
        tx.commit().await.map_err(|err| StoreError::from_sqlx(err, "commit assignment delete"))?;
        Ok(())
    }
}

#[async_trait]
impl AssignmentSubmissionStore for LocalBackend {
    async fn upsert_assignment_submission(
        &self,
        submission: &AssignmentSubmission,
    ) -> Result<(), StoreError> {
        sqlx::query(sql::UPSERT_ASSIGNMENT_SUBMISSION)
            .bind(&submission.id)
            .bind(&submission.assignment_id)
            .bind(&submission.student_id)
            .bind(&submission.answers)
            .bind(submission.status)
            .bind(submission.grade)
            .bind(&submission.student_comments)
            .bind(&submission.teacher_comments)
            .bind(submission.submitted_at)
            .bind(submission.reviewed_at)
            .bind(submission.graded_at)
            .bind(submission.created_at)
            .bind(submission.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "upsert assignment submission"))?;
        Ok(())
    }

    async fn assignment_submission_by_id(
        &self,
        id: &str,
    ) -> Result<Option<AssignmentSubmission>, StoreError> {
        sqlx::query_as::<_, AssignmentSubmission>(&format!(
            "SELECT {ASSIGNMENT_SUBMISSION_COLUMNS} FROM assignment_submissions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StoreError::from_sqlx(err, "load assignment submission"))
    }

    async fn assignment_submission_for_student(
        &self,
        assignment_id: &str,
        student_id: &str,
    ) -> Result<Option<AssignmentSubmission>, StoreError> {
        sqlx::query_as::<_, AssignmentSubmission>(&format!(
            "SELECT {ASSIGNMENT_SUBMISSION_COLUMNS} FROM assignment_submissions \
             WHERE assignment_id = $1 AND student_id = $2"
        ))
        .bind(assignment_id)
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StoreError::from_sqlx(err, "load assignment submission for student"))
    }

    async fn assignment_submissions_by_assignment(
        &self,
        assignment_id: &str,
    ) -> Result<Vec<AssignmentSubmission>, StoreError> {
        sqlx::query_as::<_, AssignmentSubmission>(&format!(
            "SELECT {ASSIGNMENT_SUBMISSION_COLUMNS} FROM assignment_submissions \
             WHERE assignment_id = $1"
        ))
        .bind(assignment_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| StoreError::from_sqlx(err, "list assignment submissions"))
    }

    async fn delete_assignment_submission(&self, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM assignment_submissions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "delete assignment submission"))?;
        Ok(())
    }
}

#[async_trait]
impl MaterialStore for LocalBackend {
    async fn save_material(
        &self,
        material: &Material,
        attachments: &[Attachment],
    ) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| StoreError::from_sqlx(err, "begin material save"))?;

        sqlx::query(sql::UPSERT_MATERIAL)
            .bind(&material.id)
            .bind(&material.stream_item_id)
            .bind(&material.description)
            .bind(material.created_at)
            .bind(material.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "save material"))?;

        sqlx::query("DELETE FROM attachments WHERE material_id = $1")
            .bind(&material.id)
            .execute(&mut *tx)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "clear attachments"))?;
        for attachment in attachments {
            sqlx::query(sql::INSERT_ATTACHMENT)
                .bind(&attachment.id)
                .bind(&attachment.material_id)
                .bind(&attachment.title)
                .bind(&attachment.url)
                .bind(&attachment.kind)
                .bind(attachment.order_index)
                .execute(&mut *tx)
                .await
                .map_err(|err| StoreError::from_sqlx(err, "insert attachment"))?;
        }

        tx.commit().await.map_err(|err| StoreError::from_sqlx(err, "commit material save"))?;
        Ok(())
    }

    async fn material_by_id(&self, id: &str) -> Result<Option<Material>, StoreError> {
        sqlx::query_as::<_, Material>(&format!(
            "SELECT {MATERIAL_COLUMNS} FROM materials WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StoreError::from_sqlx(err, "load material"))
    }

    async fn material_by_stream_item(
        &self,
        stream_item_id: &str,
    ) -> Result<Option<Material>, StoreError> {
        sqlx::query_as::<_, Material>(&format!(
            "SELECT {MATERIAL_COLUMNS} FROM materials WHERE stream_item_id = $1"
        ))
        .bind(stream_item_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StoreError::from_sqlx(err, "load material by stream item"))
    }

    async fn list_materials(&self) -> Result<Vec<Material>, StoreError> {
        sqlx::query_as::<_, Material>(&format!("SELECT {MATERIAL_COLUMNS} FROM materials"))
            .fetch_all(&self.pool)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "list materials"))
    }

    async fn attachments_by_material(
        &self,
        material_id: &str,
    ) -> Result<Vec<Attachment>, StoreError> {
        sqlx::query_as::<_, Attachment>(&format!(
            "SELECT {ATTACHMENT_COLUMNS} FROM attachments WHERE material_id = $1 \
             ORDER BY order_index"
        ))
        .bind(material_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| StoreError::from_sqlx(err, "list attachments"))
    }

    async fn delete_material(&self, id: &str) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| StoreError::from_sqlx(err, "begin material delete"))?;
        sqlx::query("DELETE FROM attachments WHERE material_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "delete attachments"))?;
        sqlx::query("DELETE FROM materials WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "delete material"))?;
        tx.commit().await.map_err(|err| StoreError::from_sqlx(err, "commit material delete"))?;
        Ok(())
    }
}

#[async_trait]
impl GradeStore for LocalBackend {
    async fn upsert_grade(&self, grade: &Grade) -> Result<(), StoreError> {
        sqlx::query(sql::UPSERT_GRADE)
            .bind(&grade.id)
            .bind(&grade.stream_item_id)
            .bind(&grade.student_id)
            .bind(grade.value)
            .bind(grade.graded_at)
            .bind(grade.created_at)
            .bind(grade.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "upsert grade"))?;
        Ok(())
    }

    async fn grades_for_student(&self, student_id: &str) -> Result<Vec<Grade>, StoreError> {
        sqlx::query_as::<_, Grade>(&format!(
            "SELECT {GRADE_COLUMNS} FROM grades WHERE student_id = $1"
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| StoreError::from_sqlx(err, "list grades for student"))
    }

    async fn grades_for_class(&self, class_id: &str) -> Result<Vec<Grade>, StoreError> {
        // Two-step lookup instead of a join; the class's stream is small.
        let item_ids = sqlx::query_scalar::<_, String>(
            "SELECT id FROM stream_items WHERE class_id = $1",
        )
        .bind(class_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| StoreError::from_sqlx(err, "list stream item ids"))?;

        let mut grades = Vec::new();
        for item_id in item_ids {
            let batch = sqlx::query_as::<_, Grade>(&format!(
                "SELECT {GRADE_COLUMNS} FROM grades WHERE stream_item_id = $1"
            ))
            .bind(&item_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "list grades for stream item"))?;
            grades.extend(batch);
        }
        Ok(grades)
    }

    async fn delete_grade(&self, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM grades WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| StoreError::from_sqlx(err, "delete grade"))?;
        Ok(())
    }
}
