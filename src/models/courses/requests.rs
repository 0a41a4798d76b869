use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/course.ts")]
pub struct CreateCourseRequest {
    pub title: String,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/course.ts")]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/course.ts")]
pub struct AttachExerciseRequest {
    pub exercise_id: i64,
}
