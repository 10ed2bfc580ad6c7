use async_trait::async_trait;

use crate::backend::{
    AssignmentStore, AssignmentSubmissionStore, DirectoryStore, GradeStore, MaterialStore,
    QuizStore, QuizSubmissionStore, StreamStore,
};
use crate::db::models::{
    Assignment, AssignmentStudent, AssignmentSubmission, Attachment, Class, Grade, Material, Quiz,
    QuizQuestion, QuizStudent, QuizSubmission, StreamItem, User,
};
use crate::error::StoreError;
use crate::store::snapshot::{remove_by_id, upsert_by_id};
use crate::store::EntityStore;

/// Adapter over the in-memory snapshot store. Every operation runs inside a
/// single lock acquisition, which is what makes the multi-row saves atomic
/// here without any transaction machinery.
pub struct JsonBackend {
    store: EntityStore,
}

impl JsonBackend {
    pub fn new(store: EntityStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }
}

#[async_trait]
impl DirectoryStore for JsonBackend {
    async fn save_user(&self, user: &User) -> Result<(), StoreError> {
        let user = user.clone();
        self.store.write(|data| upsert_by_id(&mut data.users, user));
        Ok(())
    }

    async fn user_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.store.read(|data| data.users.iter().find(|user| user.id == id).cloned()))
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.store.read(|data| data.users.clone()))
    }

    async fn users_in_group(&self, group: &str) -> Result<Vec<User>, StoreError> {
        Ok(self.store.read(|data| {
            data.users
                .iter()
                .filter(|user| user.group_name.as_deref() == Some(group))
                .cloned()
                .collect()
        }))
    }

    async fn delete_user(&self, id: &str) -> Result<(), StoreError> {
        self.store.write(|data| remove_by_id(&mut data.users, id));
        Ok(())
    }

    async fn save_class(&self, class: &Class) -> Result<(), StoreError> {
        let class = class.clone();
        self.store.write(|data| upsert_by_id(&mut data.classes, class));
        Ok(())
    }

    async fn class_by_id(&self, id: &str) -> Result<Option<Class>, StoreError> {
        Ok(self.store.read(|data| data.classes.iter().find(|class| class.id == id).cloned()))
    }

    async fn list_classes(&self) -> Result<Vec<Class>, StoreError> {
        Ok(self.store.read(|data| data.classes.clone()))
    }

    async fn delete_class(&self, id: &str) -> Result<(), StoreError> {
        self.store.write(|data| remove_by_id(&mut data.classes, id));
        Ok(())
    }
}

#[async_trait]
impl StreamStore for JsonBackend {
    async fn save_stream_item(&self, item: &StreamItem) -> Result<(), StoreError> {
        let item = item.clone();
        self.store.write(|data| upsert_by_id(&mut data.stream_items, item));
        Ok(())
    }

    async fn stream_item_by_id(&self, id: &str) -> Result<Option<StreamItem>, StoreError> {
        Ok(self.store.read(|data| data.stream_items.iter().find(|item| item.id == id).cloned()))
    }

    async fn stream_items_by_class(&self, class_id: &str) -> Result<Vec<StreamItem>, StoreError> {
        Ok(self.store.read(|data| {
            data.stream_items.iter().filter(|item| item.class_id == class_id).cloned().collect()
        }))
    }

    async fn set_stream_item_archived(&self, id: &str, archived: bool) -> Result<(), StoreError> {
        let found = self.store.write(|data| {
            match data.stream_items.iter_mut().find(|item| item.id == id) {
                Some(item) => {
                    item.archived = archived;
                    true
                }
                None => false,
            }
        });
        if !found {
            return Err(StoreError::not_found(format!("stream item {id}")));
        }
        Ok(())
    }

    async fn delete_stream_item(&self, id: &str) -> Result<(), StoreError> {
        self.store.write(|data| remove_by_id(&mut data.stream_items, id));
        Ok(())
    }
}

#[async_trait]
impl QuizStore for JsonBackend {
    async fn save_quiz(
        &self,
        quiz: &Quiz,
        questions: &[QuizQuestion],
        students: &[QuizStudent],
    ) -> Result<(), StoreError> {
        let quiz = quiz.clone();
        let questions = questions.to_vec();
        let students = students.to_vec();
        self.store.write(|data| {
            data.quiz_questions.retain(|question| question.quiz_id != quiz.id);
            data.quiz_students.retain(|student| student.quiz_id != quiz.id);
            data.quiz_questions.extend(questions);
            data.quiz_students.extend(students);
            upsert_by_id(&mut data.quizzes, quiz);
        });
        Ok(())
    }

    async fn quiz_by_id(&self, id: &str) -> Result<Option<Quiz>, StoreError> {
        Ok(self.store.read(|data| data.quizzes.iter().find(|quiz| quiz.id == id).cloned()))
    }

    async fn quiz_by_stream_item(
        &self,
        stream_item_id: &str,
    ) -> Result<Option<Quiz>, StoreError> {
        Ok(self.store.read(|data| {
            data.quizzes.iter().find(|quiz| quiz.stream_item_id == stream_item_id).cloned()
        }))
    }

    async fn list_quizzes(&self) -> Result<Vec<Quiz>, StoreError> {
        Ok(self.store.read(|data| data.quizzes.clone()))
    }

    async fn questions_by_quiz(&self, quiz_id: &str) -> Result<Vec<QuizQuestion>, StoreError> {
        let mut questions: Vec<QuizQuestion> = self.store.read(|data| {
            data.quiz_questions
                .iter()
                .filter(|question| question.quiz_id == quiz_id)
                .cloned()
                .collect()
        });
        questions.sort_by_key(|question| question.order_index);
        Ok(questions)
    }

    async fn quiz_students_by_quiz(&self, quiz_id: &str) -> Result<Vec<QuizStudent>, StoreError> {
        Ok(self.store.read(|data| {
            data.quiz_students
                .iter()
                .filter(|student| student.quiz_id == quiz_id)
                .cloned()
                .collect()
        }))
    }

    async fn quiz_ids_for_student(&self, student_id: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.store.read(|data| {
            data.quiz_students
                .iter()
                .filter(|student| student.student_id == student_id)
                .map(|student| student.quiz_id.clone())
                .collect()
        }))
    }

    async fn delete_quiz(&self, id: &str) -> Result<(), StoreError> {
        self.store.write(|data| {
            data.quiz_questions.retain(|question| question.quiz_id != id);
            data.quiz_students.retain(|student| student.quiz_id != id);
            remove_by_id(&mut data.quizzes, id);
        });
        Ok(())
    }
}

#[async_trait]
impl QuizSubmissionStore for JsonBackend {
    async fn upsert_quiz_submission(&self, submission: &QuizSubmission) -> Result<(), StoreError> {
        let mut submission = submission.clone();
        self.store.write(|data| {
            // The pair is the logical key; an existing row keeps its identity.
            if let Some(existing) = data
                .quiz_submissions
                .iter()
                .find(|row| {
                    row.quiz_id == submission.quiz_id && row.student_id == submission.student_id
                })
            {
                submission.id = existing.id.clone();
                submission.created_at = existing.created_at;
            }
            match data.quiz_submissions.iter_mut().find(|row| row.id == submission.id) {
                Some(existing) => *existing = submission,
                None => data.quiz_submissions.push(submission),
            }
        });
        Ok(())
    }

    async fn quiz_submission_by_id(
        &self,
        id: &str,
    ) -> Result<Option<QuizSubmission>, StoreError> {
        Ok(self
            .store
            .read(|data| data.quiz_submissions.iter().find(|row| row.id == id).cloned()))
    }

    async fn quiz_submission_for_student(
        &self,
        quiz_id: &str,
        student_id: &str,
    ) -> Result<Option<QuizSubmission>, StoreError> {
        Ok(self.store.read(|data| {
            data.quiz_submissions
                .iter()
                .find(|row| row.quiz_id == quiz_id && row.student_id == student_id)
                .cloned()
        }))
    }

    async fn quiz_submissions_by_quiz(
        &self,
        quiz_id: &str,
    ) -> Result<Vec<QuizSubmission>, StoreError> {
        Ok(self.store.read(|data| {
            data.quiz_submissions.iter().filter(|row| row.quiz_id == quiz_id).cloned().collect()
        }))
    }

    async fn delete_quiz_submission(&self, id: &str) -> Result<(), StoreError> {
        self.store.write(|data| remove_by_id(&mut data.quiz_submissions, id));
        Ok(())
    }
}

#[async_trait]
impl AssignmentStore for JsonBackend {
    async fn save_assignment(
        &self,
        assignment: &Assignment,
        students: &[AssignmentStudent],
    ) -> Result<(), StoreError> {
        let assignment = assignment.clone();
        let students = students.to_vec();
        self.store.write(|data| {
            data.assignment_students.retain(|student| student.assignment_id != assignment.id);
            data.assignment_students.extend(students);
            upsert_by_id(&mut data.assignments, assignment);
        });
        Ok(())
    }

    async fn assignment_by_id(&self, id: &str) -> Result<Option<Assignment>, StoreError> {
        Ok(self.store.read(|data| data.assignments.iter().find(|row| row.id == id).cloned()))
    }

    async fn assignment_by_stream_item(
        &self,
        stream_item_id: &str,
    ) -> Result<Option<Assignment>, StoreError> {
        Ok(self.store.read(|data| {
            data.assignments.iter().find(|row| row.stream_item_id == stream_item_id).cloned()
        }))
    }

    async fn list_assignments(&self) -> Result<Vec<Assignment>, StoreError> {
        Ok(self.store.read(|data| data.assignments.clone()))
    }

    async fn assignment_students_by_assignment(
        &self,
        assignment_id: &str,
    ) -> Result<Vec<AssignmentStudent>, StoreError> {
        Ok(self.store.read(|data| {
            data.assignment_students
                .iter()
                .filter(|student| student.assignment_id == assignment_id)
                .cloned()
                .collect()
        }))
    }

    async fn assignment_ids_for_student(
        &self,
        student_id: &str,
    ) -> Result<Vec<String>, StoreError> {
        Ok(self.store.read(|data| {
            data.assignment_students
                .iter()
                .filter(|student| student.student_id == student_id)
                .map(|student| student.assignment_id.clone())
                .collect()
        }))
    }

    async fn delete_assignment(&self, id: &str) -> Result<(), StoreError> {
        self.store.write(|data| {
            data.assignment_students.retain(|student| student.assignment_id != id);
            remove_by_id(&mut data.assignments, id);
        });
        Ok(())
    }
}

#[async_trait]
impl AssignmentSubmissionStore for JsonBackend {
    async fn upsert_assignment_submission(
        &self,
        submission: &AssignmentSubmission,
    ) -> Result<(), StoreError> {
        let mut submission = submission.clone();
        self.store.write(|data| {
            if let Some(existing) = data.assignment_submissions.iter().find(|row| {
                row.assignment_id == submission.assignment_id
                    && row.student_id == submission.student_id
            }) {
                submission.id = existing.id.clone();
                submission.created_at = existing.created_at;
            }
            match data.assignment_submissions.iter_mut().find(|row| row.id == submission.id) {
                Some(existing) => *existing = submission,
                None => data.assignment_submissions.push(submission),
            }
        });
        Ok(())
    }

    async fn assignment_submission_by_id(
        &self,
        id: &str,
    ) -> Result<Option<AssignmentSubmission>, StoreError> {
        Ok(self
            .store
            .read(|data| data.assignment_submissions.iter().find(|row| row.id == id).cloned()))
    }

    async fn assignment_submission_for_student(
        &self,
        assignment_id: &str,
        student_id: &str,
    ) -> Result<Option<AssignmentSubmission>, StoreError> {
        Ok(self.store.read(|data| {
            data.assignment_submissions
                .iter()
                .find(|row| row.assignment_id == assignment_id && row.student_id == student_id)
                .cloned()
        }))
    }

    async fn assignment_submissions_by_assignment(
        &self,
        assignment_id: &str,
    ) -> Result<Vec<AssignmentSubmission>, StoreError> {
        Ok(self.store.read(|data| {
            data.assignment_submissions
                .iter()
                .filter(|row| row.assignment_id == assignment_id)
                .cloned()
                .collect()
        }))
    }

    async fn delete_assignment_submission(&self, id: &str) -> Result<(), StoreError> {
        self.store.write(|data| remove_by_id(&mut data.assignment_submissions, id));
        Ok(())
    }
}

#[async_trait]
impl MaterialStore for JsonBackend {
    async fn save_material(
        &self,
        material: &Material,
        attachments: &[Attachment],
    ) -> Result<(), StoreError> {
        let material = material.clone();
        let attachments = attachments.to_vec();
        self.store.write(|data| {
            data.attachments.retain(|attachment| attachment.material_id != material.id);
            data.attachments.extend(attachments);
            upsert_by_id(&mut data.materials, material);
        });
        Ok(())
    }

    async fn material_by_id(&self, id: &str) -> Result<Option<Material>, StoreError> {
        Ok(self.store.read(|data| data.materials.iter().find(|row| row.id == id).cloned()))
    }

    async fn material_by_stream_item(
        &self,
        stream_item_id: &str,
    ) -> Result<Option<Material>, StoreError> {
        Ok(self.store.read(|data| {
            data.materials.iter().find(|row| row.stream_item_id == stream_item_id).cloned()
        }))
    }

    async fn list_materials(&self) -> Result<Vec<Material>, StoreError> {
        Ok(self.store.read(|data| data.materials.clone()))
    }

    async fn attachments_by_material(
        &self,
        material_id: &str,
    ) -> Result<Vec<Attachment>, StoreError> {
        let mut attachments: Vec<Attachment> = self.store.read(|data| {
            data.attachments
                .iter()
                .filter(|attachment| attachment.material_id == material_id)
                .cloned()
                .collect()
        });
        attachments.sort_by_key(|attachment| attachment.order_index);
        Ok(attachments)
    }

    async fn delete_material(&self, id: &str) -> Result<(), StoreError> {
        self.store.write(|data| {
            data.attachments.retain(|attachment| attachment.material_id != id);
            remove_by_id(&mut data.materials, id);
        });
        Ok(())
    }
}

#[async_trait]
impl GradeStore for JsonBackend {
    async fn upsert_grade(&self, grade: &Grade) -> Result<(), StoreError> {
        let mut grade = grade.clone();
        self.store.write(|data| {
            if let Some(existing) = data.grades.iter().find(|row| {
                row.stream_item_id == grade.stream_item_id && row.student_id == grade.student_id
            }) {
                grade.id = existing.id.clone();
                grade.created_at = existing.created_at;
            }
            match data.grades.iter_mut().find(|row| row.id == grade.id) {
                Some(existing) => *existing = grade,
                None => data.grades.push(grade),
            }
        });
        Ok(())
    }

    async fn grades_for_student(&self, student_id: &str) -> Result<Vec<Grade>, StoreError> {
        Ok(self.store.read(|data| {
            data.grades.iter().filter(|row| row.student_id == student_id).cloned().collect()
        }))
    }

    async fn grades_for_class(&self, class_id: &str) -> Result<Vec<Grade>, StoreError> {
        Ok(self.store.read(|data| {
            let item_ids: Vec<&str> = data
                .stream_items
                .iter()
                .filter(|item| item.class_id == class_id)
                .map(|item| item.id.as_str())
                .collect();
            data.grades
                .iter()
                .filter(|row| item_ids.contains(&row.stream_item_id.as_str()))
                .cloned()
                .collect()
        }))
    }

    async fn delete_grade(&self, id: &str) -> Result<(), StoreError> {
        self.store.write(|data| remove_by_id(&mut data.grades, id));
        Ok(())
    }
}
