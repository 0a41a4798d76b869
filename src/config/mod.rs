//! 应用配置
//!
//! 配置来源依次为 `config.*` 文件、`config.{APP_ENV}` 文件、`CLASSNUM_` 前缀环境变量以及少量常用环境变量覆盖。

mod r#impl;
mod structs;

pub use structs::*;
