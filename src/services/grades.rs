use crate::core::context::AppContext;
use crate::core::time::format_primitive;
use crate::db::models::Grade;
use crate::error::StoreError;
use crate::schemas::submission::GradeView;

pub async fn get_grades_for_student(
    ctx: &AppContext,
    student_id: &str,
) -> Result<Vec<GradeView>, StoreError> {
    Ok(ctx
        .backend()
        .grades_for_student(student_id)
        .await?
        .into_iter()
        .map(grade_view)
        .collect())
}

pub async fn get_grades_for_class(
    ctx: &AppContext,
    class_id: &str,
) -> Result<Vec<GradeView>, StoreError> {
    Ok(ctx.backend().grades_for_class(class_id).await?.into_iter().map(grade_view).collect())
}

fn grade_view(grade: Grade) -> GradeView {
    GradeView {
        id: grade.id,
        stream_item_id: grade.stream_item_id,
        student_id: grade.student_id,
        value: grade.value,
        graded_at: format_primitive(grade.graded_at),
    }
}
