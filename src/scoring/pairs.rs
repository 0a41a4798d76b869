//! 连线配对题
//!
//! 支持三种历史布局：
//! - `pairs: [{left, right}]`，字段 `left_i` 为所选右项在学生端右列中的位置
//! - `correct_pairs: [[l, r]]` 加 `left_items` / `right_items`，字段 `left_i` / `right_i`
//! - `pairs: [{first, second}]`，字段 `pair_i` 同上
//!
//! 前后两种布局的右列按 [`display_order`] 打乱后下发，评分时再映射回原始下标。

use std::collections::HashMap;

use serde_json::{Value, json};

use super::content::{display_order, field, first_non_empty_array, index_value, item_text, text_list};
use super::{AnswerSheet, Evaluation};
use crate::errors::{ClassNumError, Result};

const NO_ANSWER: &str = "Aucune réponse";

#[derive(Debug, Clone, PartialEq)]
pub enum PairsContent {
    LeftRight(Vec<(String, String)>),
    Indexed {
        left_items: Vec<String>,
        right_items: Vec<String>,
        correct_pairs: Vec<(i64, i64)>,
    },
    FirstSecond(Vec<(String, String)>),
}

impl PairsContent {
    pub fn parse(content: &Value) -> Result<Self> {
        if let Some(correct) = first_non_empty_array(content, &["correct_pairs"]) {
            let correct_pairs = correct
                .iter()
                .map(|pair| match pair.as_array().map(Vec::as_slice) {
                    Some([l, r]) => index_value(l).zip(index_value(r)),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| {
                    ClassNumError::invalid_content("pairs: 'correct_pairs' doit contenir des paires [gauche, droite]")
                })?;
            let items = |name: &str| {
                field(content, &[name])
                    .and_then(Value::as_array)
                    .map(|items| text_list(items))
                    .unwrap_or_default()
            };
            return Ok(Self::Indexed {
                left_items: items("left_items"),
                right_items: items("right_items"),
                correct_pairs,
            });
        }

        let pairs = first_non_empty_array(content, &["pairs"]).ok_or_else(|| {
            ClassNumError::invalid_content("pairs: champ 'pairs' ou 'correct_pairs' manquant ou vide")
        })?;

        let read = |keys: (&str, &str)| -> Vec<(String, String)> {
            pairs
                .iter()
                .map(|p| {
                    let side = |k: &str| p.get(k).map(item_text).unwrap_or_default();
                    (side(keys.0), side(keys.1))
                })
                .collect()
        };

        if pairs.iter().all(|p| p.get("left").is_some() || p.get("right").is_some()) {
            Ok(Self::LeftRight(read(("left", "right"))))
        } else if pairs.iter().all(|p| p.get("first").is_some() || p.get("second").is_some()) {
            Ok(Self::FirstSecond(read(("first", "second"))))
        } else {
            Err(ClassNumError::invalid_content(
                "pairs: chaque paire doit avoir 'left'/'right' ou 'first'/'second'",
            ))
        }
    }

    pub fn grade(&self, sheet: &AnswerSheet) -> Evaluation {
        match self {
            Self::LeftRight(pairs) => Self::grade_by_index(pairs, sheet, "left"),
            Self::FirstSecond(pairs) => Self::grade_by_index(pairs, sheet, "pair"),
            Self::Indexed {
                left_items,
                right_items,
                correct_pairs,
            } => Self::grade_indexed(left_items, right_items, correct_pairs, sheet),
        }
    }

    /// 右列展示顺序，`order[pos]` 为展示位置 pos 上的原始下标
    fn right_order(pairs: &[(String, String)]) -> Vec<usize> {
        let rights: Vec<String> = pairs.iter().map(|(_, right)| right.clone()).collect();
        display_order(&rights)
    }

    /// 学生端内容，编号布局没有需要隐藏的对应关系，返回 None
    pub fn student_view(&self, content: &Value) -> Option<Value> {
        let (pairs, (left_key, right_key)) = match self {
            Self::LeftRight(pairs) => (pairs, ("left", "right")),
            Self::FirstSecond(pairs) => (pairs, ("first", "second")),
            Self::Indexed { .. } => return None,
        };
        // 保留原始条目，图片类条目需要 type 字段
        let raw = content
            .get("pairs")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let side = |i: usize, key: &str| {
            raw.get(i)
                .and_then(|pair| pair.get(key))
                .cloned()
                .unwrap_or(Value::Null)
        };

        let left_items: Vec<Value> = (0..pairs.len()).map(|i| side(i, left_key)).collect();
        let right_items: Vec<Value> = Self::right_order(pairs)
            .into_iter()
            .map(|i| side(i, right_key))
            .collect();
        Some(json!({ "left_items": left_items, "right_items": right_items }))
    }

    /// 第 i 个左项所选位置对应的原始右项下标等于 i 即为正确
    fn grade_by_index(pairs: &[(String, String)], sheet: &AnswerSheet, prefix: &str) -> Evaluation {
        let order = Self::right_order(pairs);
        let mut correct_count = 0;
        let mut answers = serde_json::Map::new();

        let details: Vec<Value> = pairs
            .iter()
            .enumerate()
            .map(|(i, (left, right))| {
                let key = format!("{prefix}_{i}");
                let given = sheet.int(&key);
                answers.insert(key, json!(given));

                let chosen = given
                    .and_then(|pos| usize::try_from(pos).ok())
                    .and_then(|pos| order.get(pos).copied());
                let is_correct = chosen == Some(i);
                if is_correct {
                    correct_count += 1;
                }
                let given_right = chosen
                    .and_then(|idx| pairs.get(idx))
                    .map(|(_, r)| r.as_str())
                    .unwrap_or(NO_ANSWER);
                json!({
                    "left_index": i,
                    "left_item": left,
                    "expected_right": right,
                    "given_right": given_right,
                    "is_correct": is_correct,
                })
            })
            .collect();

        Evaluation::new(correct_count, pairs.len(), Value::Object(answers), details)
    }

    /// 提交的 (left_i, right_i) 组合中包含正确配对即得分
    fn grade_indexed(
        left_items: &[String],
        right_items: &[String],
        correct_pairs: &[(i64, i64)],
        sheet: &AnswerSheet,
    ) -> Evaluation {
        let slots = left_items.len().max(correct_pairs.len());
        let submitted: HashMap<i64, i64> = (0..slots)
            .filter_map(|i| {
                sheet
                    .int(&format!("left_{i}"))
                    .zip(sheet.int(&format!("right_{i}")))
            })
            .collect();

        let lookup = |items: &[String], idx: i64| -> String {
            usize::try_from(idx)
                .ok()
                .and_then(|i| items.get(i).cloned())
                .unwrap_or_default()
        };

        let mut correct_count = 0;
        let details: Vec<Value> = correct_pairs
            .iter()
            .map(|&(left, right)| {
                let given = submitted.get(&left).copied();
                let is_correct = given == Some(right);
                if is_correct {
                    correct_count += 1;
                }
                json!({
                    "left_index": left,
                    "left_item": lookup(left_items, left),
                    "expected_right": lookup(right_items, right),
                    "given_right": given.map(|g| lookup(right_items, g)).unwrap_or_else(|| NO_ANSWER.to_string()),
                    "is_correct": is_correct,
                })
            })
            .collect();

        let mut pairs: Vec<(i64, i64)> = submitted.into_iter().collect();
        pairs.sort_unstable();
        Evaluation::new(
            correct_count,
            correct_pairs.len(),
            json!({ "pairs": pairs }),
            details,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 原始右项在学生端右列中的位置
    fn shown_at(content: &PairsContent, original: usize) -> usize {
        let (PairsContent::LeftRight(pairs) | PairsContent::FirstSecond(pairs)) = content else {
            panic!("layout without shuffled column");
        };
        PairsContent::right_order(pairs)
            .iter()
            .position(|&i| i == original)
            .unwrap()
    }

    fn animals() -> Value {
        json!({
            "pairs": [
                {"left": "chien", "right": "aboie"},
                {"left": "chat", "right": "miaule"},
                {"left": {"type": "image", "content": "/uploads/pairs/vache.png"}, "right": "meugle"}
            ]
        })
    }

    #[test]
    fn test_left_right_layout() {
        let content = PairsContent::parse(&animals()).unwrap();
        let sheet = AnswerSheet::new()
            .with("left_0", shown_at(&content, 0).to_string())
            .with("left_1", shown_at(&content, 2).to_string())
            .with("left_2", shown_at(&content, 2) as i64);
        let evaluation = content.grade(&sheet);
        assert_eq!(evaluation.correct_count, 2);
        let details = evaluation.details();
        assert_eq!(details[1]["given_right"], "meugle");
        assert_eq!(details[2]["left_item"], "/uploads/pairs/vache.png");
    }

    #[test]
    fn test_indexed_layout() {
        let content = PairsContent::parse(&json!({
            "left_items": ["1", "2", "3"],
            "right_items": ["un", "deux", "trois"],
            "correct_pairs": [[0, 0], [1, 1], ["2", "2"]]
        }))
        .unwrap();
        let sheet = AnswerSheet::new()
            .with("left_0", "0")
            .with("right_0", "0")
            .with("left_1", "1")
            .with("right_1", "2");
        let evaluation = content.grade(&sheet);
        assert_eq!(evaluation.correct_count, 1);
        assert_eq!(evaluation.total_count, 3);
        let details = evaluation.details();
        assert_eq!(details[1]["given_right"], "trois");
        assert_eq!(details[2]["given_right"], NO_ANSWER);
    }

    #[test]
    fn test_first_second_layout() {
        let content = PairsContent::parse(&json!({
            "pairs": [
                {"id": 1, "first": "Paris", "second": "France"},
                {"id": 2, "first": "Rome", "second": "Italie"}
            ]
        }))
        .unwrap();
        assert!(matches!(content, PairsContent::FirstSecond(_)));
        let sheet = AnswerSheet::new()
            .with("pair_0", shown_at(&content, 0).to_string())
            .with("pair_1", shown_at(&content, 1).to_string());
        assert_eq!(content.grade(&sheet).score, 100.0);
    }

    #[test]
    fn test_student_view_shuffles_right_column() {
        let raw = animals();
        let content = PairsContent::parse(&raw).unwrap();
        let view = content.student_view(&raw).unwrap();
        assert_eq!(view["left_items"][0], "chien");
        assert_eq!(view["left_items"][2]["type"], "image");
        assert_ne!(view["right_items"], json!(["aboie", "miaule", "meugle"]));
        assert_eq!(view["right_items"][shown_at(&content, 1)], "miaule");

        // 按原始顺序提交下标不能拿满分
        let aligned = AnswerSheet::new()
            .with("left_0", 0i64)
            .with("left_1", 1i64)
            .with("left_2", 2i64);
        assert!(content.grade(&aligned).score < 100.0);
    }

    #[test]
    fn test_indexed_layout_has_no_view() {
        let raw = json!({"left_items": ["a"], "right_items": ["b"], "correct_pairs": [[0, 0]]});
        assert!(PairsContent::parse(&raw).unwrap().student_view(&raw).is_none());
    }

    #[test]
    fn test_invalid_layouts() {
        assert!(PairsContent::parse(&json!({"pairs": []})).is_err());
        assert!(PairsContent::parse(&json!({"pairs": [{"a": 1}]})).is_err());
        assert!(PairsContent::parse(&json!({"correct_pairs": [[0]]})).is_err());
    }
}
