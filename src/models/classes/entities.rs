use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../bindings/class.ts")]
pub struct Class {
    pub id: i64,
    // 负责教师
    pub teacher_id: i64,
    pub name: String,
    pub description: Option<String>,
    // 学生加入班级所用的访问码
    pub access_code: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 班级中的学生
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../bindings/class.ts")]
pub struct ClassStudent {
    pub student_id: i64,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub school_name: Option<String>,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}
