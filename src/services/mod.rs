pub mod assignment_submissions;
pub mod assignments;
pub mod directory;
pub mod grades;
pub(crate) mod lifecycle;
pub mod materials;
pub mod quiz_submissions;
pub mod quizzes;
pub mod stream;
pub(crate) mod visibility;
