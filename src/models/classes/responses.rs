use super::entities::{Class, ClassStudent};
use crate::models::common::PaginationInfo;
use crate::models::courses::Course;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/class.ts")]
pub struct ClassListResponse {
    pub pagination: PaginationInfo,
    pub items: Vec<Class>,
}

// 班级详情，含课程
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/class.ts")]
pub struct ClassDetailResponse {
    pub class: Class,
    pub teacher_name: String,
    pub student_count: i64,
    pub courses: Vec<Course>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/class.ts")]
pub struct ClassStudentListResponse {
    pub items: Vec<ClassStudent>,
}
