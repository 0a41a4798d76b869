use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程附件
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../bindings/file.ts")]
pub struct CourseFile {
    pub id: i64,
    pub course_id: i64,
    pub uploaded_by: i64,
    // 上传时的原始文件名
    pub original_name: String,
    // 磁盘上的文件名
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub stored_name: String,
    pub content_type: String,
    // 字节
    pub file_size: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
