//! 填空题与放词题
//!
//! 两者都按位置把 `answer_i` 与期望答案对齐；填空题另外支持“排序”模式和不计顺序模式。

use serde_json::{Value, json};

use super::content::{bool_value, display_order, field, first_non_empty_array, item_text, required_array, text_list};
use super::text::{blank_location, count_blanks, count_blanks_in, normalize_answer};
use super::{AnswerSheet, Evaluation, GradingOptions};
use crate::errors::{ClassNumError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct BlanksContent {
    pub sentences: Vec<String>,
    /// 没有 sentences 时使用的整段文本
    pub text: Option<String>,
    pub answers: Vec<String>,
    pub order_insensitive: bool,
}

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Ascending,
    Descending,
}

impl OrderDirection {
    fn label(&self) -> &'static str {
        match self {
            OrderDirection::Ascending => "croissant",
            OrderDirection::Descending => "décroissant",
        }
    }

    fn holds(&self, numbers: &[f64]) -> bool {
        numbers.windows(2).all(|w| match self {
            OrderDirection::Ascending => w[0] <= w[1],
            OrderDirection::Descending => w[0] >= w[1],
        })
    }
}

/// 从练习说明中识别“按顺序排列”类题目
///
/// “décroissant” 包含 “croissant”，因此先判断降序。
pub fn detect_ordering(description: &str) -> Option<OrderDirection> {
    let lowered = description.to_lowercase();
    if !(lowered.contains("ranger") && lowered.contains("ordre")) {
        return None;
    }
    if lowered.contains("décroissant") || lowered.contains("decroissant") {
        Some(OrderDirection::Descending)
    } else if lowered.contains("croissant") {
        Some(OrderDirection::Ascending)
    } else {
        None
    }
}

impl BlanksContent {
    pub fn parse_fill_in(content: &Value) -> Result<Self> {
        let sentences = first_non_empty_array(content, &["sentences"])
            .map(|items| text_list(items))
            .unwrap_or_default();
        let text = field(content, &["text"]).map(item_text).filter(|t| !t.is_empty());
        if sentences.is_empty() && text.is_none() {
            return Err(ClassNumError::invalid_content(
                "fill_in_blanks: 'sentences' ou 'text' est requis",
            ));
        }

        let answers = required_array(
            content,
            &["words", "available_words", "answers"],
            "fill_in_blanks",
        )?;

        Ok(Self {
            sentences,
            text,
            answers: text_list(answers),
            order_insensitive: bool_value(content, "order_insensitive"),
        })
    }

    pub fn parse_word_placement(content: &Value) -> Result<Self> {
        let sentences = required_array(content, &["sentences"], "word_placement")?;
        let answers = required_array(content, &["answers"], "word_placement")?;
        Ok(Self {
            sentences: text_list(sentences),
            text: None,
            answers: text_list(answers),
            order_insensitive: false,
        })
    }

    /// 学生端词库，顺序与空格无关
    pub fn word_bank(&self) -> Vec<&String> {
        display_order(&self.answers)
            .into_iter()
            .map(|i| &self.answers[i])
            .collect()
    }

    /// 空格数：有句子时统计句子，否则统计整段文本
    pub fn blank_count(&self) -> usize {
        if !self.sentences.is_empty() {
            count_blanks_in(&self.sentences)
        } else {
            self.text.as_deref().map(count_blanks).unwrap_or(0)
        }
    }

    /// 需要评分的空格总数
    pub fn total(&self) -> usize {
        self.blank_count().max(self.answers.len())
    }

    fn located_sentences(&self) -> Vec<String> {
        if self.sentences.is_empty() {
            self.text.iter().cloned().collect()
        } else {
            self.sentences.clone()
        }
    }

    fn user_answers(&self, sheet: &AnswerSheet) -> Vec<String> {
        (0..self.total())
            .map(|i| sheet.text_or_empty(&format!("answer_{i}")))
            .collect()
    }

    fn answers_record(user_answers: &[String]) -> Value {
        let map = user_answers
            .iter()
            .enumerate()
            .map(|(i, a)| (format!("answer_{i}"), json!(a)))
            .collect();
        Value::Object(map)
    }

    fn detail(
        &self,
        sentences: &[String],
        index: usize,
        user_answer: &str,
        correct_answer: &str,
        is_correct: bool,
        status: String,
    ) -> Value {
        let location = blank_location(index, sentences);
        let (sentence_index, local_index) = location
            .map(|(s, l)| (s as i64, l as i64))
            .unwrap_or((-1, -1));
        json!({
            "blank_index": index,
            "user_answer": user_answer,
            "correct_answer": correct_answer,
            "is_correct": is_correct,
            "status": status,
            "sentence_index": sentence_index,
            "local_blank_index": local_index,
            "sentence": location.map(|(s, _)| &sentences[s]),
        })
    }

    fn status(user_answer: &str, correct_answer: &str, is_correct: bool) -> String {
        if is_correct {
            "Correct".to_string()
        } else if user_answer.is_empty() {
            format!("Attendu: {correct_answer}, Réponse: Vide")
        } else {
            format!("Attendu: {correct_answer}, Réponse: {user_answer}")
        }
    }

    /// 逐位比较
    pub fn grade_positional(&self, sheet: &AnswerSheet) -> Evaluation {
        let user_answers = self.user_answers(sheet);
        let sentences = self.located_sentences();
        let mut correct_count = 0;

        let details: Vec<Value> = user_answers
            .iter()
            .enumerate()
            .map(|(i, given)| {
                let expected = self.answers.get(i).map(String::as_str).unwrap_or("");
                let is_correct = !given.is_empty() && normalize_answer(given) == normalize_answer(expected);
                if is_correct {
                    correct_count += 1;
                }
                self.detail(&sentences, i, given, expected, is_correct, Self::status(given, expected, is_correct))
            })
            .collect();

        Evaluation::new(correct_count, self.total(), Self::answers_record(&user_answers), details)
    }

    /// 不计顺序：每个答案消耗第一个尚未匹配的期望答案
    fn grade_unordered(&self, sheet: &AnswerSheet) -> Evaluation {
        let user_answers = self.user_answers(sheet);
        let sentences = self.located_sentences();
        let mut remaining: Vec<&str> = self.answers.iter().map(String::as_str).collect();
        let mut correct_count = 0;

        let details: Vec<Value> = user_answers
            .iter()
            .enumerate()
            .map(|(i, given)| {
                let normalized = normalize_answer(given);
                let matched = (!given.is_empty())
                    .then(|| remaining.iter().position(|e| normalize_answer(e) == normalized))
                    .flatten()
                    .map(|pos| remaining.remove(pos));

                let is_correct = matched.is_some();
                if is_correct {
                    correct_count += 1;
                }
                let expected = matched
                    .or_else(|| self.answers.get(i).map(String::as_str))
                    .unwrap_or("");
                self.detail(&sentences, i, given, expected, is_correct, Self::status(given, expected, is_correct))
            })
            .collect();

        Evaluation::new(correct_count, self.total(), Self::answers_record(&user_answers), details)
    }

    /// 排序题：顺序正确且数字齐全得满分，仅顺序正确得一半（向下取整）
    fn grade_ordering(&self, sheet: &AnswerSheet, direction: OrderDirection) -> Evaluation {
        let user_answers = self.user_answers(sheet);
        let total = self.total();

        let parse_all = |values: &[String]| -> Option<Vec<f64>> {
            values
                .iter()
                .filter(|v| !v.trim().is_empty())
                .map(|v| v.trim().parse::<f64>().ok())
                .collect()
        };

        let (correct_count, all_correct) = match (parse_all(user_answers.as_slice()), parse_all(self.answers.as_slice())) {
            (Some(given), Some(expected)) => {
                let in_order = direction.holds(&given);
                let all_present = distinct_sorted(&given) == distinct_sorted(&expected);
                match (in_order, all_present) {
                    (true, true) => (total, true),
                    (true, false) => (total / 2, false),
                    _ => (0, false),
                }
            }
            _ => {
                tracing::debug!("排序题答案无法解析为数字");
                (0, false)
            }
        };

        let status = if all_correct {
            "Correct".to_string()
        } else {
            format!("Attendu: ordre {}", direction.label())
        };
        let details: Vec<Value> = (0..total)
            .map(|i| {
                json!({
                    "blank_index": i,
                    "user_answer": user_answers.get(i).cloned().unwrap_or_default(),
                    "correct_answer": self.answers.get(i).cloned().unwrap_or_default(),
                    "is_correct": all_correct,
                    "status": status,
                    "sentence_index": -1,
                })
            })
            .collect();

        Evaluation::new(correct_count, total, Self::answers_record(&user_answers), details)
            .with_feedback("ordering", json!(direction.label()))
    }

    pub fn grade_fill_in(&self, sheet: &AnswerSheet, options: &GradingOptions) -> Evaluation {
        if let Some(direction) = options.description.as_deref().and_then(detect_ordering) {
            return self.grade_ordering(sheet, direction);
        }
        if self.order_insensitive || options.order_insensitive_blanks {
            return self.grade_unordered(sheet);
        }
        self.grade_positional(sheet)
    }
}

fn distinct_sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_in(content: Value) -> BlanksContent {
        BlanksContent::parse_fill_in(&content).unwrap()
    }

    fn ordering_options(description: &str) -> GradingOptions {
        GradingOptions {
            description: Some(description.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_answer_source_priority() {
        let c = fill_in(json!({
            "text": "Le ___ dort.",
            "words": [],
            "available_words": ["chat"],
            "answers": ["chien"]
        }));
        assert_eq!(c.answers, vec!["chat"]);
        assert!(BlanksContent::parse_fill_in(&json!({"text": "___"})).is_err());
        assert!(BlanksContent::parse_fill_in(&json!({"words": ["a"]})).is_err());
    }

    #[test]
    fn test_sentences_take_precedence_over_text() {
        let c = fill_in(json!({
            "sentences": ["Un ___.", "Deux ___ ___."],
            "text": "___",
            "words": ["a"]
        }));
        assert_eq!(c.blank_count(), 3);
        assert_eq!(c.total(), 3);
    }

    #[test]
    fn test_total_uses_larger_of_blanks_and_answers() {
        let c = fill_in(json!({"text": "Un ___.", "words": ["a", "b", "c"]}));
        assert_eq!(c.total(), 3);
        let evaluation = c.grade_positional(&AnswerSheet::new().with("answer_0", "A"));
        assert!((evaluation.score - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_positional_feedback_locates_blanks() {
        let c = fill_in(json!({
            "sentences": ["Le ___ mange.", "La ___ court et le ___ saute."],
            "words": ["chat", "souris", "chien"]
        }));
        let sheet = AnswerSheet::new()
            .with("answer_0", " Chat ")
            .with("answer_2", "lapin");
        let evaluation = c.grade_fill_in(&sheet, &GradingOptions::default());
        assert_eq!(evaluation.correct_count, 1);
        let details = evaluation.details();
        assert_eq!(details[0]["status"], "Correct");
        assert_eq!(details[1]["status"], "Attendu: souris, Réponse: Vide");
        assert_eq!(details[2]["status"], "Attendu: chien, Réponse: lapin");
        assert_eq!(details[2]["sentence_index"], 1);
        assert_eq!(details[2]["local_blank_index"], 1);
    }

    #[test]
    fn test_extra_answers_have_no_location() {
        let c = fill_in(json!({"sentences": ["Un ___."], "words": ["a", "b"]}));
        let evaluation = c.grade_positional(&AnswerSheet::new());
        assert_eq!(evaluation.details()[1]["sentence_index"], -1);
        assert_eq!(evaluation.details()[1]["local_blank_index"], -1);
    }

    #[test]
    fn test_order_insensitive_from_content() {
        let c = fill_in(json!({
            "sentences": ["___ et ___ et ___"],
            "words": ["rouge", "vert", "rouge"],
            "order_insensitive": true
        }));
        let sheet = AnswerSheet::new()
            .with("answer_0", "Vert")
            .with("answer_1", "rouge")
            .with("answer_2", "rouge");
        let evaluation = c.grade_fill_in(&sheet, &GradingOptions::default());
        assert_eq!(evaluation.score, 100.0);
    }

    #[test]
    fn test_order_insensitive_consumes_matches() {
        let c = fill_in(json!({"sentences": ["___ ___"], "words": ["rouge", "vert"]}));
        let options = GradingOptions {
            order_insensitive_blanks: true,
            ..Default::default()
        };
        let sheet = AnswerSheet::new()
            .with("answer_0", "rouge")
            .with("answer_1", "rouge");
        let evaluation = c.grade_fill_in(&sheet, &options);
        assert_eq!(evaluation.correct_count, 1);
    }

    #[test]
    fn test_detect_ordering_prefers_descending() {
        assert_eq!(
            detect_ordering("Ranger par ordre décroissant"),
            Some(OrderDirection::Descending)
        );
        assert_eq!(
            detect_ordering("RANGER dans l'ordre decroissant"),
            Some(OrderDirection::Descending)
        );
        assert_eq!(
            detect_ordering("Ranger par ordre croissant : 0.9 - 0.85"),
            Some(OrderDirection::Ascending)
        );
        assert_eq!(detect_ordering("Ordre croissant"), None);
        assert_eq!(detect_ordering("Ranger par ordre alphabétique"), None);
    }

    #[test]
    fn test_ordering_full_half_and_zero() {
        let c = fill_in(json!({
            "sentences": ["___ < ___ < ___ < ___"],
            "words": ["0.08", "0.18", "0.8", "0.9"]
        }));
        let options = ordering_options("Ranger par ordre croissant");

        let sheet = |values: [&str; 4]| {
            values
                .iter()
                .enumerate()
                .fold(AnswerSheet::new(), |s, (i, v)| s.with(format!("answer_{i}"), *v))
        };

        let full = c.grade_fill_in(&sheet(["0.08", "0.18", "0.8", "0.9"]), &options);
        assert_eq!(full.score, 100.0);

        let half = c.grade_fill_in(&sheet(["0.08", "0.18", "0.8", "0.95"]), &options);
        assert_eq!(half.correct_count, 2);
        assert_eq!(half.details()[0]["status"], "Attendu: ordre croissant");

        let wrong = c.grade_fill_in(&sheet(["0.9", "0.8", "0.18", "0.08"]), &options);
        assert_eq!(wrong.correct_count, 0);

        let invalid = c.grade_fill_in(&sheet(["abc", "0.18", "0.8", "0.9"]), &options);
        assert_eq!(invalid.score, 0.0);
    }

    #[test]
    fn test_descending_ordering() {
        let c = fill_in(json!({"text": "___ > ___ > ___", "words": ["3", "2", "1"]}));
        let sheet = AnswerSheet::new()
            .with("answer_0", "3")
            .with("answer_1", "2")
            .with("answer_2", "1");
        let evaluation = c.grade_fill_in(&sheet, &ordering_options("Ranger par ordre décroissant"));
        assert_eq!(evaluation.score, 100.0);
        assert_eq!(evaluation.feedback["ordering"], "décroissant");
    }

    #[test]
    fn test_word_placement_positional() {
        let c = BlanksContent::parse_word_placement(&json!({
            "sentences": ["Le ___ brille.", "La ___ éclaire."],
            "answers": ["soleil", "lune"]
        }))
        .unwrap();
        let sheet = AnswerSheet::new()
            .with("answer_0", "lune")
            .with("answer_1", "LUNE");
        let evaluation = c.grade_positional(&sheet);
        assert_eq!(evaluation.score, 50.0);
        assert!(BlanksContent::parse_word_placement(&json!({"sentences": ["___"]})).is_err());
    }
}
