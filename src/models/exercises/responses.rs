use super::entities::{Exercise, ExerciseSummary};
use crate::models::attempts::AttemptProgress;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/exercise.ts")]
pub struct ExerciseListResponse {
    pub pagination: PaginationInfo,
    pub items: Vec<ExerciseSummary>,
}

// 练习详情；学生视角下 content 已去除答案，并附带个人进度
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/exercise.ts")]
pub struct ExerciseDetailResponse {
    pub exercise: Exercise,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<AttemptProgress>,
}
