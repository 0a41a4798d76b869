//! 练习内容 JSON 的读取辅助
//!
//! 历史数据中同一含义的字段有多种写法，读取时按优先级依次尝试。

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::errors::{ClassNumError, Result};

/// 依次查找第一个存在且非 null 的字段
pub fn field<'a>(value: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| value.get(*name))
        .find(|v| !v.is_null())
}

/// 依次查找第一个非空数组
pub fn first_non_empty_array<'a>(value: &'a Value, names: &[&str]) -> Option<&'a Vec<Value>> {
    names
        .iter()
        .filter_map(|name| value.get(*name).and_then(Value::as_array))
        .find(|items| !items.is_empty())
}

/// 必填的非空数组
pub fn required_array<'a>(
    value: &'a Value,
    names: &[&str],
    exercise_type: &str,
) -> Result<&'a Vec<Value>> {
    first_non_empty_array(value, names).ok_or_else(|| {
        ClassNumError::invalid_content(format!(
            "{exercise_type}: champ '{}' manquant ou vide",
            names.join("' / '")
        ))
    })
}

/// 内容必须是 JSON 对象
pub fn as_object<'a>(value: &'a Value, exercise_type: &str) -> Result<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        ClassNumError::invalid_content(format!("{exercise_type}: le contenu doit être un objet JSON"))
    })
}

/// 条目的展示文本：字符串、数字，或带 text/content/label 的对象
pub fn item_text(item: &Value) -> String {
    match item {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Object(_) => field(item, &["text", "content", "label", "word"])
            .map(item_text)
            .unwrap_or_default(),
        _ => String::new(),
    }
}

pub fn text_list(items: &[Value]) -> Vec<String> {
    items.iter().map(item_text).collect()
}

/// 可选字符串字段
pub fn opt_string(value: &Value, names: &[&str]) -> Option<String> {
    field(value, names).map(item_text)
}

/// 下标值：整数或数字字符串
pub fn index_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn bool_value(value: &Value, name: &str) -> bool {
    match value.get(name) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// serde 字段：条目文本，规则同 [`item_text`]
pub fn de_text<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    Value::deserialize(d).map(|v| item_text(&v))
}

/// serde 字段：条目文本数组，非数组视为空
pub fn de_text_list<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Vec<String>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(value.as_array().map(|items| text_list(items)).unwrap_or_default())
}

/// serde 字段：可缺省的下标
pub fn de_opt_index<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<i64>, D::Error> {
    Value::deserialize(d).map(|v| index_value(&v))
}

/// serde 字段：下标数组，任一元素不是下标即报错
pub fn de_index_list<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Vec<i64>, D::Error> {
    let value = Value::deserialize(d)?;
    let items = value.as_array().map(Vec::as_slice).unwrap_or_default();
    items
        .iter()
        .map(|item| {
            index_value(item)
                .ok_or_else(|| serde::de::Error::custom(format!("indice invalide: {item}")))
        })
        .collect()
}

/// 把内容反序列化为带类型的结构，错误转为 `InvalidContent`
pub fn from_content<T: serde::de::DeserializeOwned>(value: &Value, context: &str) -> Result<T> {
    T::deserialize(value)
        .map_err(|e| ClassNumError::invalid_content(format!("{context}: {e}")))
}

fn fnv1a(text: &str) -> u64 {
    text.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

/// 学生端展示顺序，`order[pos]` 为展示位置 pos 上的原始下标
///
/// 只依赖条目文本，同一份内容每次得到相同顺序；多于一项时不会与原顺序相同。
pub fn display_order(items: &[String]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by_key(|&i| (fnv1a(&items[i]), i));
    if order.len() > 1 && order.iter().enumerate().all(|(pos, &i)| pos == i) {
        order.rotate_left(1);
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_priority_skips_null() {
        let v = json!({"text": null, "question": "Q?"});
        assert_eq!(field(&v, &["text", "question"]), Some(&json!("Q?")));
    }

    #[test]
    fn test_first_non_empty_array_follows_priority() {
        let v = json!({"words": [], "available_words": ["a"], "answers": ["b"]});
        let items = first_non_empty_array(&v, &["words", "available_words", "answers"]).unwrap();
        assert_eq!(items, &vec![json!("a")]);
    }

    #[test]
    fn test_required_array_error_mentions_names() {
        let err = required_array(&json!({}), &["questions"], "qcm").unwrap_err();
        assert_eq!(err.code(), "E012");
        assert!(err.message().contains("questions"));
    }

    #[test]
    fn test_item_text_variants() {
        assert_eq!(item_text(&json!("chat")), "chat");
        assert_eq!(item_text(&json!(12)), "12");
        assert_eq!(
            item_text(&json!({"type": "image", "content": "/uploads/pairs/a.png"})),
            "/uploads/pairs/a.png"
        );
        assert_eq!(item_text(&json!(null)), "");
    }

    #[test]
    fn test_index_value() {
        assert_eq!(index_value(&json!(2)), Some(2));
        assert_eq!(index_value(&json!("3")), Some(3));
        assert_eq!(index_value(&json!(1.0)), Some(1));
        assert_eq!(index_value(&json!("x")), None);
    }

    #[test]
    fn test_display_order_is_stable_permutation() {
        let items: Vec<String> = ["aboie", "miaule", "meugle", "hennit"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let order = display_order(&items);
        assert_eq!(order, display_order(&items));
        assert_ne!(order, vec![0, 1, 2, 3]);
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3]);
        assert_eq!(display_order(&items[..1]), vec![0]);
        assert!(display_order(&[]).is_empty());
    }

    #[test]
    fn test_serde_field_helpers() {
        #[derive(Debug, Deserialize)]
        struct Item {
            #[serde(default, deserialize_with = "de_text")]
            label: String,
            #[serde(default, deserialize_with = "de_opt_index")]
            index: Option<i64>,
            #[serde(default, deserialize_with = "de_index_list")]
            order: Vec<i64>,
        }
        let item: Item =
            from_content(&json!({"label": {"text": "chat"}, "index": "2", "order": [1, "0"]}), "test").unwrap();
        assert_eq!(item.label, "chat");
        assert_eq!(item.index, Some(2));
        assert_eq!(item.order, vec![1, 0]);

        let err = from_content::<Item>(&json!({"order": ["x"]}), "test").unwrap_err();
        assert!(err.is_content_error());
        let empty: Item = from_content(&json!({}), "test").unwrap();
        assert_eq!(empty.index, None);
    }
}
