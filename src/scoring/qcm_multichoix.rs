//! 多选题

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};

use super::content::{de_text, de_text_list, from_content, index_value, required_array};
use super::{AnswerSheet, Evaluation};
use crate::errors::{ClassNumError, Result};

/// 正确选项集合，忽略无法识别的下标
fn de_option_set<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<BTreeSet<usize>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(index_value)
                .filter_map(|idx| usize::try_from(idx).ok())
                .collect()
        })
        .unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MultichoixQuestion {
    #[serde(default, alias = "question", deserialize_with = "de_text")]
    pub text: String,
    #[serde(default, alias = "choices", deserialize_with = "de_text_list")]
    pub options: Vec<String>,
    #[serde(default, alias = "correct_answers", deserialize_with = "de_option_set")]
    pub correct_options: BTreeSet<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultichoixContent {
    pub questions: Vec<MultichoixQuestion>,
}

impl MultichoixContent {
    pub fn parse(content: &Value) -> Result<Self> {
        let questions = required_array(content, &["questions"], "qcm_multichoix")?
            .iter()
            .enumerate()
            .map(|(i, q)| {
                let question: MultichoixQuestion =
                    from_content(q, &format!("qcm_multichoix: question {}", i + 1))?;
                if question.options.is_empty() {
                    return Err(ClassNumError::invalid_content(format!(
                        "qcm_multichoix: la question {} n'a pas d'options",
                        i + 1
                    )));
                }
                Ok(question)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { questions })
    }

    pub fn grade(&self, sheet: &AnswerSheet) -> Evaluation {
        let mut correct_count = 0;
        let mut details = Vec::with_capacity(self.questions.len());
        let mut answers = serde_json::Map::new();

        for (i, question) in self.questions.iter().enumerate() {
            // 非数字的取值直接忽略
            let selected: BTreeSet<usize> = sheet
                .list(&format!("question_{i}"))
                .iter()
                .filter(|v| !v.is_empty() && v.chars().all(|c| c.is_ascii_digit()))
                .filter_map(|v| v.parse().ok())
                .collect();

            let is_correct = selected == question.correct_options;
            if is_correct {
                correct_count += 1;
            }

            let texts = |indices: &BTreeSet<usize>| -> Vec<String> {
                indices
                    .iter()
                    .filter_map(|idx| question.options.get(*idx).cloned())
                    .collect()
            };

            answers.insert(format!("question_{i}"), json!(selected));
            details.push(json!({
                "question_index": i,
                "question_text": question.text,
                "user_selected": texts(&selected),
                "correct_options": texts(&question.correct_options),
                "is_correct": is_correct,
                "status": if is_correct { "Correct" } else { "Incorrect" },
            }));
        }

        Evaluation::new(
            correct_count,
            self.questions.len(),
            Value::Object(answers),
            details,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> MultichoixContent {
        MultichoixContent::parse(&json!({
            "questions": [
                {"text": "Nombres pairs ?", "options": ["1", "2", "3", "4"], "correct_options": [1, 3]},
                {"text": "Voyelles ?", "options": ["a", "b"], "correct_options": ["0"]}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_exact_set_required() {
        let sheet = AnswerSheet::new()
            .with("question_0[]", vec!["3", "1"])
            .with("question_1[]", vec!["0", "1"]);
        let evaluation = content().grade(&sheet);
        assert_eq!(evaluation.correct_count, 1);
        assert_eq!(evaluation.score, 50.0);
        let details = evaluation.details();
        assert_eq!(details[0]["user_selected"], json!(["2", "4"]));
        assert_eq!(details[1]["status"], "Incorrect");
    }

    #[test]
    fn test_non_digit_and_out_of_range_values() {
        let sheet = AnswerSheet::new()
            .with("question_0", vec!["1", "x", "3"])
            .with("question_1[]", vec!["0", "9"]);
        let evaluation = content().grade(&sheet);
        // "x" 被忽略，问题 1 因为多选了 9 而错误
        assert_eq!(evaluation.correct_count, 1);
        assert_eq!(evaluation.details()[1]["user_selected"], json!(["a"]));
    }

    #[test]
    fn test_nothing_selected() {
        let evaluation = content().grade(&AnswerSheet::new());
        assert_eq!(evaluation.score, 0.0);
        assert_eq!(evaluation.total_count, 2);
    }
}
