use super::entities::CourseFile;
use serde::Serialize;
use ts_rs::TS;

/// 练习图片上传结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/file.ts")]
pub struct ImageUploadResponse {
    /// 可直接访问的路径，形如 `/uploads/<exercise_type>/<name>`
    pub path: String,
    pub file_name: String,
    pub size: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/file.ts")]
pub struct CourseFileUploadResponse {
    pub file: CourseFile,
}
