use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 班级列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/class.ts")]
pub struct ClassQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/class.ts")]
pub struct CreateClassRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/class.ts")]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../bindings/class.ts")]
pub struct JoinClassRequest {
    pub access_code: String,
}

/// 班级可见范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassScope {
    /// 教师拥有的班级
    OwnedBy(i64),
    /// 学生已加入的班级
    EnrolledBy(i64),
    /// 全部班级（管理员）
    All,
}

// 班级列表查询（存储层）
#[derive(Debug, Clone)]
pub struct ClassListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub scope: ClassScope,
    pub search: Option<String>,
}
