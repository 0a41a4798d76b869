//! 提交的表单字段
//!
//! 前端以 JSON 对象提交字段，值可能是字符串、数字、布尔、数组或对象，
//! 与 HTML 表单字段（`answer_0`、`question_1[]`）一一对应。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 单个字段的值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<FieldValue>),
    Object(Map<String, Value>),
}

impl FieldValue {
    /// 标量值的文本形式，已去除首尾空白
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Null => None,
            FieldValue::Bool(b) => Some(b.to_string()),
            FieldValue::Int(i) => Some(i.to_string()),
            FieldValue::Float(f) => Some(f.to_string()),
            FieldValue::Text(s) => Some(s.trim().to_string()),
            // 与表单同名多值时取第一个的行为一致
            FieldValue::List(items) => items.first().and_then(FieldValue::as_text),
            FieldValue::Object(_) => None,
        }
    }

    fn texts(&self) -> Vec<String> {
        match self {
            FieldValue::List(items) => items.iter().filter_map(FieldValue::as_text).collect(),
            other => other.as_text().into_iter().collect(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        FieldValue::List(values.into_iter().map(FieldValue::from).collect())
    }
}

/// 一次提交的全部字段
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSheet(BTreeMap<String, FieldValue>);

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 标量字段的文本，去除首尾空白
    pub fn text(&self, name: &str) -> Option<String> {
        self.0.get(name).and_then(FieldValue::as_text)
    }

    /// 标量字段的文本，缺失时为空串
    pub fn text_or_empty(&self, name: &str) -> String {
        self.text(name).unwrap_or_default()
    }

    /// 多值字段，同时接受 `name` 与 `name[]`
    pub fn list(&self, name: &str) -> Vec<String> {
        self.0
            .get(name)
            .or_else(|| self.0.get(&format!("{name}[]")))
            .map(FieldValue::texts)
            .unwrap_or_default()
    }

    /// 整数字段，无法解析时为 `None`
    pub fn int(&self, name: &str) -> Option<i64> {
        match self.0.get(name)? {
            FieldValue::Int(i) => Some(*i),
            FieldValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            other => other.as_text()?.parse().ok(),
        }
    }

    /// 布尔标记，接受 `true` 或字符串 `"true"`
    pub fn flag(&self, name: &str) -> bool {
        match self.0.get(name) {
            Some(FieldValue::Bool(b)) => *b,
            Some(other) => other
                .as_text()
                .is_some_and(|s| s.eq_ignore_ascii_case("true")),
            None => false,
        }
    }

    /// JSON 对象字段，也接受内容为 JSON 对象的字符串
    pub fn object(&self, name: &str) -> Option<Map<String, Value>> {
        match self.0.get(name)? {
            FieldValue::Object(map) => Some(map.clone()),
            FieldValue::Text(s) => match serde_json::from_str::<Value>(s) {
                Ok(Value::Object(map)) => Some(map),
                _ => None,
            },
            _ => None,
        }
    }

    /// 以指定前缀开头的字段
    pub fn with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a FieldValue)> + 'a {
        self.0
            .iter()
            .filter(move |(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sheet(value: Value) -> AnswerSheet {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_deserialize_mixed_values() {
        let s = sheet(json!({
            "answer_0": " Paris ",
            "answer_1": 2,
            "question_0[]": ["0", "2"],
            "card_0_correct": true,
            "user_answers": {"1": "coeur"},
            "empty": null
        }));
        assert_eq!(s.text("answer_0").as_deref(), Some("Paris"));
        assert_eq!(s.int("answer_1"), Some(2));
        assert_eq!(s.list("question_0"), vec!["0", "2"]);
        assert!(s.flag("card_0_correct"));
        assert_eq!(s.object("user_answers").unwrap()["1"], "coeur");
        assert_eq!(s.text("empty"), None);
    }

    #[test]
    fn test_int_parsing_is_lenient() {
        let s = AnswerSheet::new()
            .with("a", " 3 ")
            .with("b", "x")
            .with("c", FieldValue::Float(1.0));
        assert_eq!(s.int("a"), Some(3));
        assert_eq!(s.int("b"), None);
        assert_eq!(s.int("c"), Some(1));
        assert_eq!(s.int("missing"), None);
    }

    #[test]
    fn test_object_from_json_string() {
        let s = AnswerSheet::new().with("user_answers", r#"{"1":"tête","2":"bras"}"#);
        let map = s.object("user_answers").unwrap();
        assert_eq!(map["2"], "bras");

        let s = AnswerSheet::new().with("user_answers", "pas du json");
        assert!(s.object("user_answers").is_none());
    }

    #[test]
    fn test_flag_accepts_string() {
        let s = AnswerSheet::new().with("x", "true").with("y", "false");
        assert!(s.flag("x"));
        assert!(!s.flag("y"));
        assert!(!s.flag("z"));
    }

    #[test]
    fn test_prefix_iteration() {
        let s = AnswerSheet::new()
            .with("word_1", "chat")
            .with("word_2", "chien")
            .with("other", "x");
        assert_eq!(s.with_prefix("word_").count(), 2);
    }
}
