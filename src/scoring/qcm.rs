//! 单选题

use serde::Deserialize;
use serde_json::{Value, json};

use super::content::{de_opt_index, de_text, de_text_list, from_content, required_array};
use super::{AnswerSheet, Evaluation};
use crate::errors::{ClassNumError, Result};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QcmQuestion {
    #[serde(default, alias = "question", deserialize_with = "de_text")]
    pub text: String,
    #[serde(default, alias = "choices", deserialize_with = "de_text_list")]
    pub options: Vec<String>,
    /// 正确选项下标，缺失时该题无法判对
    #[serde(default, alias = "correct_answer", deserialize_with = "de_opt_index")]
    pub correct: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QcmContent {
    pub questions: Vec<QcmQuestion>,
}

impl QcmContent {
    pub fn parse(content: &Value) -> Result<Self> {
        let questions = required_array(content, &["questions"], "qcm")?
            .iter()
            .enumerate()
            .map(|(i, q)| {
                let question: QcmQuestion = from_content(q, &format!("qcm: question {}", i + 1))?;
                if question.options.is_empty() {
                    return Err(ClassNumError::invalid_content(format!(
                        "qcm: la question {} n'a pas d'options",
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
            let key = format!("answer_{i}");
            let user_answer = sheet.int(&key).unwrap_or(-1);
            answers.insert(key, json!(user_answer));

            let Some(correct) = question.correct else {
                details.push(json!({
                    "question": i + 1,
                    "question_text": question.text,
                    "user_answer": user_answer,
                    "correct": false,
                    "message": "Erreur: réponse correcte non définie pour cette question",
                }));
                continue;
            };

            let is_correct = user_answer == correct;
            if is_correct {
                correct_count += 1;
            }
            let message = if is_correct {
                "Bonne réponse !".to_string()
            } else {
                let expected = usize::try_from(correct)
                    .ok()
                    .and_then(|idx| question.options.get(idx))
                    .map(String::as_str)
                    .unwrap_or("Non spécifiée");
                format!("La réponse correcte était : {expected}")
            };

            details.push(json!({
                "question": i + 1,
                "question_text": question.text,
                "user_answer": user_answer,
                "correct_answer": correct,
                "correct": is_correct,
                "message": message,
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

    fn content() -> QcmContent {
        QcmContent::parse(&json!({
            "questions": [
                {"text": "Capitale de la France ?", "options": ["Lyon", "Paris"], "correct": 1},
                {"question": "2 + 2 ?", "choices": ["3", "4", "5"], "correct_answer": "1"},
                {"text": "Sans clé", "options": ["a", "b"]}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_accepts_alias_fields() {
        let c = content();
        assert_eq!(c.questions[1].text, "2 + 2 ?");
        assert_eq!(c.questions[1].options.len(), 3);
        assert_eq!(c.questions[1].correct, Some(1));
        assert_eq!(c.questions[2].correct, None);
    }

    #[test]
    fn test_parse_rejects_missing_questions_or_options() {
        assert!(QcmContent::parse(&json!({"questions": []})).is_err());
        assert!(QcmContent::parse(&json!({"questions": [{"text": "Q"}]})).is_err());
    }

    #[test]
    fn test_question_without_key_counts_in_total() {
        let sheet = AnswerSheet::new().with("answer_0", "1").with("answer_1", 1i64);
        let evaluation = content().grade(&sheet);
        assert_eq!(evaluation.correct_count, 2);
        assert_eq!(evaluation.total_count, 3);
        let details = evaluation.details();
        assert_eq!(details[0]["message"], "Bonne réponse !");
        assert!(
            details[2]["message"]
                .as_str()
                .unwrap()
                .starts_with("Erreur")
        );
    }

    #[test]
    fn test_wrong_answer_shows_expected_option() {
        let sheet = AnswerSheet::new().with("answer_0", "0").with("answer_1", "abc");
        let evaluation = content().grade(&sheet);
        assert_eq!(evaluation.correct_count, 0);
        let details = evaluation.details();
        assert_eq!(details[0]["message"], "La réponse correcte était : Paris");
        assert_eq!(details[1]["user_answer"], -1);
    }

    #[test]
    fn test_out_of_range_key_is_unspecified() {
        let c = QcmContent::parse(&json!({
            "questions": [{"text": "Q", "options": ["a"], "correct": 5}]
        }))
        .unwrap();
        let evaluation = c.grade(&AnswerSheet::new().with("answer_0", 0i64));
        assert_eq!(
            evaluation.details()[0]["message"],
            "La réponse correcte était : Non spécifiée"
        );
    }
}
