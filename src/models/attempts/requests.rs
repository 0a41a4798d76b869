use crate::scoring::AnswerSheet;
use serde::Deserialize;
use ts_rs::TS;

// 提交作答
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/attempt.ts")]
pub struct SubmitAttemptRequest {
    /// 通过课程作答时携带
    pub course_id: Option<i64>,
    /// 表单字段，如 `answer_0`、`question_1[]`
    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub answers: AnswerSheet,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/attempt.ts")]
pub struct AttemptStatsParams {
    pub course_id: Option<i64>,
}

/// 评分完成、待写入的答题记录
#[derive(Debug, Clone)]
pub struct NewExerciseAttempt {
    pub student_id: i64,
    pub exercise_id: i64,
    pub course_id: Option<i64>,
    pub score: f64,
    pub answers: serde_json::Value,
    pub feedback: serde_json::Value,
}
