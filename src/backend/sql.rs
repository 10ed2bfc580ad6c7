//! Statements shared by the remote (Postgres) and local (SQLite) adapters.
//! Both engines accept `$N` placeholders and `ON CONFLICT .. DO UPDATE`, so
//! the DML is common; only DDL and join strategy differ per adapter.

pub(crate) const UPSERT_USER: &str = "\
    INSERT INTO users (id, email, full_name, role, group_name, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
    ON CONFLICT (id) DO UPDATE SET
        email = excluded.email,
        full_name = excluded.full_name,
        role = excluded.role,
        group_name = excluded.group_name,
        updated_at = excluded.updated_at";

pub(crate) const UPSERT_CLASS: &str = "\
    INSERT INTO classes (id, title, subject, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5)
    ON CONFLICT (id) DO UPDATE SET
        title = excluded.title,
        subject = excluded.subject,
        updated_at = excluded.updated_at";

pub(crate) const UPSERT_STREAM_ITEM: &str = "\
    INSERT INTO stream_items (id, class_id, author_id, kind, title, content, archived, created_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
    ON CONFLICT (id) DO UPDATE SET
        class_id = excluded.class_id,
        author_id = excluded.author_id,
        kind = excluded.kind,
        title = excluded.title,
        content = excluded.content,
        archived = excluded.archived";

pub(crate) const UPSERT_QUIZ: &str = "\
    INSERT INTO quizzes (id, stream_item_id, points, due_at, description, assign_to_all, \
                         assigned_groups, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
    ON CONFLICT (id) DO UPDATE SET
        points = excluded.points,
        due_at = excluded.due_at,
        description = excluded.description,
        assign_to_all = excluded.assign_to_all,
        assigned_groups = excluded.assigned_groups,
        updated_at = excluded.updated_at";

pub(crate) const INSERT_QUIZ_QUESTION: &str = "\
    INSERT INTO quiz_questions (id, quiz_id, title, kind, required, points, correct_answer, \
                                options, order_index)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)";

pub(crate) const INSERT_QUIZ_STUDENT: &str =
    "INSERT INTO quiz_students (id, quiz_id, student_id) VALUES ($1, $2, $3)";

pub(crate) const UPSERT_QUIZ_SUBMISSION: &str = "\
    INSERT INTO quiz_submissions (id, quiz_id, student_id, answers, status, grade, \
                                  student_comments, teacher_comments, submitted_at, reviewed_at, \
                                  graded_at, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
    ON CONFLICT (quiz_id, student_id) DO UPDATE SET
        answers = excluded.answers,
        status = excluded.status,
        grade = excluded.grade,
        student_comments = excluded.student_comments,
        teacher_comments = excluded.teacher_comments,
        submitted_at = excluded.submitted_at,
        reviewed_at = excluded.reviewed_at,
        graded_at = excluded.graded_at,
        updated_at = excluded.updated_at";

pub(crate) const UPSERT_ASSIGNMENT: &str = "\
    INSERT INTO assignments (id, stream_item_id, points, due_at, description, assign_to_all, \
                             assigned_groups, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
    ON CONFLICT (id) DO UPDATE SET
        points = excluded.points,
        due_at = excluded.due_at,
        description = excluded.description,
        assign_to_all = excluded.assign_to_all,
        assigned_groups = excluded.assigned_groups,
        updated_at = excluded.updated_at";

pub(crate) const INSERT_ASSIGNMENT_STUDENT: &str =
    "INSERT INTO assignment_students (id, assignment_id, student_id) VALUES ($1, $2, $3)";

pub(crate) const UPSERT_ASSIGNMENT_SUBMISSION: &str = "\
    INSERT INTO assignment_submissions (id, assignment_id, student_id, answers, status, grade, \
                                        student_comments, teacher_comments, submitted_at, \
                                        reviewed_at, graded_at, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
    ON CONFLICT (assignment_id, student_id) DO UPDATE SET
        answers = excluded.answers,
        status = excluded.status,
        grade = excluded.grade,
        student_comments = excluded.student_comments,
        teacher_comments = excluded.teacher_comments,
        submitted_at = excluded.submitted_at,
        reviewed_at = excluded.reviewed_at,
        graded_at = excluded.graded_at,
        updated_at = excluded.updated_at";

pub(crate) const UPSERT_MATERIAL: &str = "\
    INSERT INTO materials (id, stream_item_id, description, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5)
    ON CONFLICT (id) DO UPDATE SET
        description = excluded.description,
        updated_at = excluded.updated_at";

pub(crate) const INSERT_ATTACHMENT: &str = "\
    INSERT INTO attachments (id, material_id, title, url, kind, order_index)
    VALUES ($1, $2, $3, $4, $5, $6)";

pub(crate) const UPSERT_GRADE: &str = "\
    INSERT INTO grades (id, stream_item_id, student_id, value, graded_at, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
    ON CONFLICT (stream_item_id, student_id) DO UPDATE SET
        value = excluded.value,
        graded_at = excluded.graded_at,
        updated_at = excluded.updated_at";
