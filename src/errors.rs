//! 统一错误处理模块
//!
//! 错误类型由宏生成，每个变体带有稳定的错误代码与类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 生成 enum、`code()`、`error_type()`、`message()` 以及 snake_case 构造函数
macro_rules! define_classnum_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum ClassNumError {
            $($variant(String),)*
        }

        impl ClassNumError {
            /// 错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(ClassNumError::$variant(_) => $code,)*
                }
            }

            /// 错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(ClassNumError::$variant(_) => $type_name,)*
                }
            }

            /// 错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(ClassNumError::$variant(msg) => msg,)*
                }
            }
        }

        paste::paste! {
            impl ClassNumError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        ClassNumError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_classnum_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    Authentication("E010", "Authentication Error"),
    Authorization("E011", "Authorization Error"),
    InvalidContent("E012", "Invalid Exercise Content"),
    UnsupportedExerciseType("E013", "Unsupported Exercise Type"),
    AttemptLimit("E014", "Attempt Limit Reached"),
}

impl ClassNumError {
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否属于练习内容相关错误（无法评分）
    pub fn is_content_error(&self) -> bool {
        matches!(
            self,
            ClassNumError::InvalidContent(_) | ClassNumError::UnsupportedExerciseType(_)
        )
    }
}

impl fmt::Display for ClassNumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ClassNumError {}

impl From<sea_orm::DbErr> for ClassNumError {
    fn from(err: sea_orm::DbErr) -> Self {
        ClassNumError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for ClassNumError {
    fn from(err: std::io::Error) -> Self {
        ClassNumError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ClassNumError {
    fn from(err: serde_json::Error) -> Self {
        ClassNumError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClassNumError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ClassNumError::cache_connection("x").code(), "E001");
        assert_eq!(ClassNumError::validation("x").code(), "E007");
        assert_eq!(ClassNumError::invalid_content("x").code(), "E012");
        assert_eq!(ClassNumError::attempt_limit("x").code(), "E014");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            ClassNumError::unsupported_exercise_type("x").error_type(),
            "Unsupported Exercise Type"
        );
        assert_eq!(
            ClassNumError::not_found("x").error_type(),
            "Resource Not Found"
        );
    }

    #[test]
    fn test_format_simple() {
        let err = ClassNumError::invalid_content("questions manquantes");
        let formatted = err.format_simple();
        assert!(formatted.contains("Invalid Exercise Content"));
        assert!(formatted.contains("questions manquantes"));
        assert_eq!(err.to_string(), formatted);
    }

    #[test]
    fn test_content_error_classification() {
        assert!(ClassNumError::invalid_content("x").is_content_error());
        assert!(ClassNumError::unsupported_exercise_type("x").is_content_error());
        assert!(!ClassNumError::validation("x").is_content_error());
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let converted: ClassNumError = err.into();
        assert_eq!(converted.code(), "E009");
    }
}
