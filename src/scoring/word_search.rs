//! 找词题

use serde_json::{Value, json};

use super::content::{required_array, text_list};
use super::{AnswerSheet, Evaluation, FieldValue};
use crate::errors::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct WordSearchContent {
    pub words: Vec<String>,
}

impl WordSearchContent {
    pub fn parse(content: &Value) -> Result<Self> {
        let words = required_array(content, &["words"], "word_search")?;
        Ok(Self {
            words: text_list(words),
        })
    }

    /// 找到的单词，大写去重并保持提交顺序
    fn found_words(sheet: &AnswerSheet) -> Vec<String> {
        let mut raw: Vec<String> = sheet
            .with_prefix("word_")
            .filter_map(|(_, v)| v.as_text())
            .collect();

        if raw.is_empty() {
            raw = match sheet.get("found_words") {
                Some(FieldValue::List(_)) | None => sheet.list("found_words"),
                Some(value) => value
                    .as_text()
                    .map(|s| s.split(',').map(str::to_string).collect())
                    .unwrap_or_default(),
            };
        }

        let mut found = Vec::new();
        for word in raw {
            let upper = word.trim().to_uppercase();
            if !upper.is_empty() && upper != "UNDEFINED" && !found.contains(&upper) {
                found.push(upper);
            }
        }
        found
    }

    pub fn grade(&self, sheet: &AnswerSheet) -> Evaluation {
        let expected: Vec<String> = self.words.iter().map(|w| w.trim().to_uppercase()).collect();
        let found = Self::found_words(sheet);

        let (correct, incorrect): (Vec<&String>, Vec<&String>) =
            found.iter().partition(|w| expected.contains(*w));
        let missed: Vec<&String> = expected.iter().filter(|w| !found.contains(*w)).collect();

        let details: Vec<Value> = expected
            .iter()
            .map(|word| json!({ "word": word, "found": found.contains(word) }))
            .collect();

        Evaluation::new(
            correct.len(),
            self.words.len(),
            json!({ "found_words": found }),
            details,
        )
        .with_feedback("correct_words", json!(correct))
        .with_feedback("incorrect_words", json!(incorrect))
        .with_feedback("missed_words", json!(missed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> WordSearchContent {
        WordSearchContent::parse(&json!({"words": ["chat", "Chien", "lapin"]})).unwrap()
    }

    #[test]
    fn test_word_fields_are_case_insensitive_and_distinct() {
        let sheet = AnswerSheet::new()
            .with("word_0", "CHAT")
            .with("word_1", "chat")
            .with("word_2", "chien")
            .with("word_3", "undefined")
            .with("word_4", "tigre");
        let evaluation = content().grade(&sheet);
        assert_eq!(evaluation.correct_count, 2);
        assert_eq!(evaluation.total_count, 3);
        assert_eq!(evaluation.feedback["incorrect_words"], json!(["TIGRE"]));
        assert_eq!(evaluation.feedback["missed_words"], json!(["LAPIN"]));
    }

    #[test]
    fn test_comma_separated_found_words() {
        let sheet = AnswerSheet::new().with("found_words", "lapin, chat");
        let evaluation = content().grade(&sheet);
        assert_eq!(evaluation.correct_count, 2);
    }

    #[test]
    fn test_found_words_list() {
        let sheet = AnswerSheet::new().with("found_words[]", vec!["chien", "lapin", "chat"]);
        assert_eq!(content().grade(&sheet).score, 100.0);
    }
}
