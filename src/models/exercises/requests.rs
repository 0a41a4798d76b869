use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/exercise.ts")]
pub struct CreateExerciseRequest {
    pub title: String,
    pub description: Option<String>,
    pub exercise_type: String,
    pub content: serde_json::Value,
    pub subject: Option<String>,
    pub max_attempts: Option<i32>,
    pub image_path: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/exercise.ts")]
pub struct UpdateExerciseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<serde_json::Value>,
    pub subject: Option<String>,
    pub max_attempts: Option<i32>,
    pub image_path: Option<String>,
}

// 练习库查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/exercise.ts")]
pub struct ExerciseLibraryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub exercise_type: Option<String>,
    pub subject: Option<String>,
    pub search: Option<String>,
    /// 只看自己创建的练习
    #[serde(default)]
    pub mine: bool,
}

// 练习列表查询（存储层）
#[derive(Debug, Clone, Default)]
pub struct ExerciseListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub teacher_id: Option<i64>,
    pub exercise_type: Option<String>,
    pub subject: Option<String>,
    pub search: Option<String>,
}
