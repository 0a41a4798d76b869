use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

/// 单页条目上限
pub const MAX_PAGE_SIZE: i64 = 100;

// 分页查询参数，兼容 `?page=2` 与 JSON 数字
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../bindings/pagination.ts")]
pub struct PaginationQuery {
    #[serde(default = "default_page", deserialize_with = "lenient_i64")]
    pub page: i64,
    #[serde(default = "default_size", deserialize_with = "lenient_i64")]
    pub size: i64,
}

impl PaginationQuery {
    /// 规整后的 (page, size)，page 从 1 开始
    pub fn normalized(&self) -> (u64, u64) {
        let page = self.page.max(1) as u64;
        let size = self.size.clamp(1, MAX_PAGE_SIZE) as u64;
        (page, size)
    }
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            size: default_size(),
        }
    }
}

// 分页信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../bindings/pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationInfo {
    pub fn new(page: u64, page_size: u64, total: u64, total_pages: u64) -> Self {
        Self {
            page: page as i64,
            page_size: page_size as i64,
            total: total as i64,
            total_pages: total_pages as i64,
        }
    }
}

// 分页列表
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../bindings/pagination.ts")]
pub struct PaginatedResponse<T: TS> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(i64),
    Text(String),
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("无效的分页参数: '{s}'"))),
    }
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_accepts_strings_and_numbers() {
        let q: PaginationQuery = serde_json::from_str(r#"{"page":"3","size":20}"#).unwrap();
        assert_eq!(q.page, 3);
        assert_eq!(q.size, 20);

        let q: PaginationQuery = serde_json::from_str("{}").unwrap();
        assert_eq!((q.page, q.size), (1, 10));

        assert!(serde_json::from_str::<PaginationQuery>(r#"{"page":"abc"}"#).is_err());
    }

    #[test]
    fn test_pagination_normalized_clamps() {
        let q = PaginationQuery { page: 0, size: 1000 };
        assert_eq!(q.normalized(), (1, MAX_PAGE_SIZE as u64));

        let q = PaginationQuery { page: -4, size: 0 };
        assert_eq!(q.normalized(), (1, 1));
    }
}
