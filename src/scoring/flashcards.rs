//! 记忆卡片
//!
//! 评分在服务端完成，客户端提交的 `final_score` 只做记录。

use serde::Deserialize;
use serde_json::{Value, json};

use super::content::required_array;
use super::text::normalize_answer;
use super::{AnswerSheet, Evaluation};
use crate::errors::{ClassNumError, Result};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Flashcard {
    #[serde(alias = "front")]
    pub question: String,
    #[serde(alias = "back")]
    pub answer: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlashcardsContent {
    pub cards: Vec<Flashcard>,
}

impl FlashcardsContent {
    pub fn parse(content: &Value) -> Result<Self> {
        let cards = required_array(content, &["cards"], "flashcards")?
            .iter()
            .enumerate()
            .map(|(i, card)| {
                Flashcard::deserialize(card).map_err(|e| {
                    ClassNumError::invalid_content(format!("flashcards: carte {} invalide: {e}", i + 1))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { cards })
    }

    pub fn grade(&self, sheet: &AnswerSheet) -> Evaluation {
        let mut correct_count = 0;
        let mut answers = serde_json::Map::new();

        let details: Vec<Value> = self
            .cards
            .iter()
            .enumerate()
            .map(|(i, card)| {
                let typed = sheet.text_or_empty(&format!("card_{i}_answer"));
                let is_correct = if typed.is_empty() {
                    sheet.flag(&format!("card_{i}_correct"))
                } else {
                    normalize_answer(&typed) == normalize_answer(&card.answer)
                };
                if is_correct {
                    correct_count += 1;
                }
                answers.insert(
                    format!("card_{i}"),
                    json!({ "answer": typed, "correct": is_correct }),
                );

                json!({
                    "card_index": i,
                    "question": card.question,
                    "expected_answer": card.answer,
                    "user_answer": typed,
                    "is_correct": is_correct,
                })
            })
            .collect();

        if let Some(client_score) = sheet.text("final_score") {
            answers.insert("client_final_score".to_string(), json!(client_score));
        }

        Evaluation::new(
            correct_count,
            self.cards.len(),
            Value::Object(answers),
            details,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> FlashcardsContent {
        FlashcardsContent::parse(&json!({
            "cards": [
                {"question": "Capitale de l'Italie", "answer": "Rome"},
                {"front": "3 x 3", "back": "9"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_typed_answer_checked_on_server() {
        let sheet = AnswerSheet::new()
            .with("card_0_answer", " rome ")
            .with("card_1_answer", "6")
            .with("card_1_correct", "true");
        let evaluation = content().grade(&sheet);
        assert_eq!(evaluation.correct_count, 1);
    }

    #[test]
    fn test_client_flag_used_without_typed_answer() {
        let sheet = AnswerSheet::new()
            .with("card_0_correct", true)
            .with("final_score", "100");
        let evaluation = content().grade(&sheet);
        assert_eq!(evaluation.score, 50.0);
        assert_eq!(evaluation.answers["client_final_score"], "100");
    }

    #[test]
    fn test_invalid_card_rejected() {
        let err = FlashcardsContent::parse(&json!({"cards": [{"question": "Q"}]})).unwrap_err();
        assert!(err.message().contains("carte 1"));
    }
}
