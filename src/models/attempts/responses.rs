use super::entities::{AttemptProgress, AttemptSummary, ExerciseAttempt};
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/attempt.ts")]
pub struct SubmitAttemptResponse {
    pub attempt: ExerciseAttempt,
    pub progress: AttemptProgress,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/attempt.ts")]
pub struct AttemptListResponse {
    pub items: Vec<ExerciseAttempt>,
    pub progress: AttemptProgress,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/attempt.ts")]
pub struct StudentProgress {
    pub student_id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub progress: AttemptProgress,
}

// 练习统计（教师视角）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/attempt.ts")]
pub struct ExerciseStatsResponse {
    pub exercise_id: i64,
    pub course_id: Option<i64>,
    pub summary: AttemptSummary,
    pub students: Vec<StudentProgress>,
}
