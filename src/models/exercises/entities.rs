use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 练习
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../bindings/exercise.ts")]
pub struct Exercise {
    pub id: i64,
    // 创建者
    pub teacher_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub exercise_type: String,
    // 题目内容，结构取决于 exercise_type
    pub content: serde_json::Value,
    pub subject: Option<String>,
    pub image_path: Option<String>,
    // 为空时使用全局默认值
    pub max_attempts: Option<i32>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 列表中展示的练习摘要（不含内容）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../bindings/exercise.ts")]
pub struct ExerciseSummary {
    pub id: i64,
    pub teacher_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub exercise_type: String,
    pub subject: Option<String>,
    pub image_path: Option<String>,
    pub max_attempts: Option<i32>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Exercise> for ExerciseSummary {
    fn from(exercise: &Exercise) -> Self {
        Self {
            id: exercise.id,
            teacher_id: exercise.teacher_id,
            title: exercise.title.clone(),
            description: exercise.description.clone(),
            exercise_type: exercise.exercise_type.clone(),
            subject: exercise.subject.clone(),
            image_path: exercise.image_path.clone(),
            max_attempts: exercise.max_attempts,
            created_at: exercise.created_at,
        }
    }
}
