use super::entities::Course;
use crate::models::exercises::ExerciseSummary;
use crate::models::files::CourseFile;
use serde::Serialize;
use ts_rs::TS;

// 课程详情，含练习与附件
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/course.ts")]
pub struct CourseDetailResponse {
    pub course: Course,
    pub class_name: String,
    pub exercises: Vec<ExerciseSummary>,
    pub files: Vec<CourseFile>,
}

// 可添加到课程的练习
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/course.ts")]
pub struct AvailableExercisesResponse {
    pub items: Vec<ExerciseSummary>,
}
