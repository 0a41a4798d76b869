use serde::Deserialize;
use ts_rs::TS;

/// 已落盘、待登记的课程附件
#[derive(Debug, Clone)]
pub struct NewCourseFile {
    pub course_id: i64,
    pub uploaded_by: i64,
    pub original_name: String,
    pub stored_name: String,
    pub content_type: String,
    pub file_size: i64,
}

// 练习图片上传参数，图片按练习类型分目录保存
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/file.ts")]
pub struct ImageUploadQuery {
    pub exercise_type: String,
}
