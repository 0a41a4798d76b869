use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../bindings/course.ts")]
pub struct Course {
    pub id: i64,
    pub class_id: i64,
    pub title: String,
    // 课程正文
    pub content: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 课程与练习的关联
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../bindings/course.ts")]
pub struct CourseExercise {
    pub course_id: i64,
    pub exercise_id: i64,
    pub added_at: chrono::DateTime<chrono::Utc>,
}
