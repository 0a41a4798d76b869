//! 拖放排序题

use serde::Deserialize;
use serde_json::{Value, json};

use super::content::{de_index_list, de_text_list, from_content};
use super::{AnswerSheet, Evaluation};
use crate::errors::{ClassNumError, Result};

const EMPTY_ZONE: &str = "Vide";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DragAndDropContent {
    #[serde(default, deserialize_with = "de_text_list")]
    pub draggable_items: Vec<String>,
    /// 第 i 个放置区应放入的条目下标
    #[serde(default, deserialize_with = "de_index_list")]
    pub correct_order: Vec<i64>,
}

impl DragAndDropContent {
    pub fn parse(content: &Value) -> Result<Self> {
        let parsed: Self = from_content(content, "drag_and_drop")?;
        for (name, empty) in [
            ("draggable_items", parsed.draggable_items.is_empty()),
            ("correct_order", parsed.correct_order.is_empty()),
        ] {
            if empty {
                return Err(ClassNumError::invalid_content(format!(
                    "drag_and_drop: champ '{name}' manquant ou vide"
                )));
            }
        }
        Ok(parsed)
    }

    fn item(&self, index: i64) -> &str {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.draggable_items.get(i))
            .map(String::as_str)
            .unwrap_or(EMPTY_ZONE)
    }

    pub fn grade(&self, sheet: &AnswerSheet) -> Evaluation {
        let user_order: Vec<i64> = (0..self.draggable_items.len())
            .map(|i| sheet.int(&format!("answer_{i}")).unwrap_or(-1))
            .collect();

        let mut correct_count = 0;
        let details: Vec<Value> = self
            .correct_order
            .iter()
            .enumerate()
            .map(|(zone, &expected)| {
                let given = user_order.get(zone).copied().unwrap_or(-1);
                let is_correct = expected != -1 && given == expected;
                if is_correct {
                    correct_count += 1;
                }
                json!({
                    "zone": zone + 1,
                    "expected": self.item(expected),
                    "given": self.item(given),
                    "is_correct": is_correct,
                })
            })
            .collect();

        Evaluation::new(
            correct_count,
            self.correct_order.len(),
            json!({ "order": user_order }),
            details,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> DragAndDropContent {
        DragAndDropContent::parse(&json!({
            "draggable_items": ["printemps", "été", "automne", "hiver"],
            "correct_order": [0, 1, 2, 3]
        }))
        .unwrap()
    }

    #[test]
    fn test_partial_order() {
        let sheet = AnswerSheet::new()
            .with("answer_0", "0")
            .with("answer_1", "2")
            .with("answer_2", "1");
        let evaluation = content().grade(&sheet);
        assert_eq!(evaluation.correct_count, 1);
        assert_eq!(evaluation.score, 25.0);
        let details = evaluation.details();
        assert_eq!(details[1]["given"], "automne");
        assert_eq!(details[3]["given"], "Vide");
    }

    #[test]
    fn test_unset_zone_never_correct() {
        let content = DragAndDropContent::parse(&json!({
            "draggable_items": ["a", "b"],
            "correct_order": [-1, 1]
        }))
        .unwrap();
        let evaluation = content.grade(&AnswerSheet::new().with("answer_1", 1i64));
        assert_eq!(evaluation.correct_count, 1);
    }

    #[test]
    fn test_rejects_non_index_order() {
        assert!(
            DragAndDropContent::parse(&json!({
                "draggable_items": ["a"],
                "correct_order": ["x"]
            }))
            .is_err()
        );
    }
}
