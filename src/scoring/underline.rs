//! 划词题

use std::collections::BTreeSet;

use serde_json::{Value, json};

use super::content::{field, item_text, required_array, text_list};
use super::text::normalize_word;
use super::{AnswerSheet, Evaluation};
use crate::errors::{ClassNumError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct UnderlineSentence {
    pub text: String,
    pub words_to_underline: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnderlineContent {
    pub sentences: Vec<UnderlineSentence>,
}

fn normalized_set<'a>(words: impl IntoIterator<Item = &'a String>) -> BTreeSet<String> {
    words
        .into_iter()
        .map(|w| normalize_word(w))
        .filter(|w| !w.is_empty())
        .collect()
}

impl UnderlineContent {
    /// 句子可以是 `{text, words_to_underline}` 对象，
    /// 也可以是纯文本，此时答案取顶层 `words_to_underline` 的同位元素
    pub fn parse(content: &Value) -> Result<Self> {
        let parallel = content.get("words_to_underline").and_then(Value::as_array);
        let words_at = |i: usize| -> Option<Vec<String>> {
            parallel?.get(i)?.as_array().map(|items| text_list(items))
        };

        let sentences = required_array(content, &["sentences", "words"], "underline_words")?
            .iter()
            .enumerate()
            .map(|(i, s)| match s {
                Value::Object(_) => Ok(UnderlineSentence {
                    text: field(s, &["text", "sentence"]).map(item_text).unwrap_or_default(),
                    words_to_underline: field(s, &["words_to_underline"])
                        .and_then(Value::as_array)
                        .map(|items| text_list(items))
                        .or_else(|| words_at(i))
                        .unwrap_or_default(),
                }),
                Value::String(text) => {
                    let words = words_at(i).ok_or_else(|| {
                        ClassNumError::invalid_content(format!(
                            "underline_words: aucun mot à souligner pour la phrase {}",
                            i + 1
                        ))
                    })?;
                    Ok(UnderlineSentence {
                        text: text.clone(),
                        words_to_underline: words,
                    })
                }
                _ => Err(ClassNumError::invalid_content(format!(
                    "underline_words: la phrase {} doit être un texte ou un objet {{text, words_to_underline}}",
                    i + 1
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { sentences })
    }

    /// 第 i 句学生划出的单词
    fn selected_words(sheet: &AnswerSheet, index: usize) -> Vec<String> {
        match sheet.text(&format!("selected_words_{index}")) {
            Some(joined) if !joined.is_empty() => joined.split(',').map(|w| w.trim().to_string()).collect(),
            _ => sheet.list(&format!("underlined_words_{index}")),
        }
    }

    pub fn grade(&self, sheet: &AnswerSheet) -> Evaluation {
        let mut correct_count = 0;
        let mut answers = serde_json::Map::new();

        let details: Vec<Value> = self
            .sentences
            .iter()
            .enumerate()
            .map(|(i, sentence)| {
                let selected = Self::selected_words(sheet, i);
                let given = normalized_set(&selected);
                let expected = normalized_set(&sentence.words_to_underline);

                let is_correct = given == expected;
                if is_correct {
                    correct_count += 1;
                }
                answers.insert(format!("underlined_words_{i}"), json!(selected));

                json!({
                    "sentence_index": i,
                    "sentence_text": sentence.text,
                    "user_underlined": given,
                    "expected_words": sentence.words_to_underline,
                    "is_correct": is_correct,
                    "missing_words": expected.difference(&given).collect::<Vec<_>>(),
                    "extra_words": given.difference(&expected).collect::<Vec<_>>(),
                })
            })
            .collect();

        Evaluation::new(
            correct_count,
            self.sentences.len(),
            Value::Object(answers),
            details,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> UnderlineContent {
        UnderlineContent::parse(&json!({
            "sentences": [
                {"text": "Le chat mange la souris.", "words_to_underline": ["chat", "souris"]},
                {"text": "L'enfant joue.", "words_to_underline": ["l'enfant"]}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_comma_separated_selection_with_punctuation() {
        let sheet = AnswerSheet::new()
            .with("selected_words_0", "souris., Chat")
            .with("selected_words_1", "enfant");
        let evaluation = content().grade(&sheet);
        assert_eq!(evaluation.score, 100.0);
    }

    #[test]
    fn test_missing_and_extra_words() {
        let sheet = AnswerSheet::new().with("underlined_words_0[]", vec!["chat", "mange"]);
        let evaluation = content().grade(&sheet);
        assert_eq!(evaluation.correct_count, 0);
        let first = &evaluation.details()[0];
        assert_eq!(first["missing_words"], json!(["souris"]));
        assert_eq!(first["extra_words"], json!(["mange"]));
    }

    #[test]
    fn test_words_key_alias_and_validation() {
        let c = UnderlineContent::parse(&json!({
            "words": [{"text": "Il pleut.", "words_to_underline": ["pleut"]}]
        }))
        .unwrap();
        assert_eq!(c.sentences.len(), 1);
        assert!(UnderlineContent::parse(&json!({"sentences": ["texte brut"]})).is_err());
        assert!(UnderlineContent::parse(&json!({"sentences": [42]})).is_err());
    }

    #[test]
    fn test_plain_sentences_with_parallel_words() {
        let c = UnderlineContent::parse(&json!({
            "sentences": ["Le chat dort.", "Il pleut."],
            "words_to_underline": [["chat"], ["pleut"]]
        }))
        .unwrap();
        assert_eq!(c.sentences[1].text, "Il pleut.");
        assert_eq!(c.sentences[1].words_to_underline, vec!["pleut"]);

        let sheet = AnswerSheet::new()
            .with("selected_words_0", "chat")
            .with("selected_words_1", "pleut");
        assert_eq!(c.grade(&sheet).score, 100.0);
    }
}
