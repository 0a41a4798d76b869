//! 听写题

use serde::Deserialize;
use serde_json::{Value, json};

use super::content::{de_text_list, from_content};
use super::text::{normalize_sentence, word_similarity};
use super::{AnswerSheet, Evaluation};
use crate::errors::{ClassNumError, Result};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DictationContent {
    #[serde(default, deserialize_with = "de_text_list")]
    pub sentences: Vec<String>,
    /// 每句对应的音频路径，可缺省
    #[serde(default)]
    pub audio_files: Vec<Option<String>>,
}

impl DictationContent {
    pub fn parse(content: &Value) -> Result<Self> {
        let parsed: Self = from_content(content, "dictation")?;
        if parsed.sentences.is_empty() {
            return Err(ClassNumError::invalid_content(
                "dictation: champ 'sentences' manquant ou vide",
            ));
        }
        Ok(parsed)
    }

    /// 学生端内容：只给音频和句子数
    pub fn student_view(&self) -> Value {
        json!({
            "audio_files": self.audio_files,
            "sentence_count": self.sentences.len(),
        })
    }

    pub fn grade(&self, sheet: &AnswerSheet) -> Evaluation {
        let mut correct_count = 0;
        let mut answers = serde_json::Map::new();

        let details: Vec<Value> = self
            .sentences
            .iter()
            .enumerate()
            .map(|(i, reference)| {
                let key = format!("dictation_answer_{i}");
                let given = sheet.text_or_empty(&key);
                answers.insert(key, json!(given));

                let normalized_given = normalize_sentence(&given);
                let normalized_reference = normalize_sentence(reference);
                let is_correct = normalized_given == normalized_reference;
                if is_correct {
                    correct_count += 1;
                }

                json!({
                    "sentence_index": i,
                    "user_answer": given,
                    "reference_sentence": reference,
                    "is_correct": is_correct,
                    "similarity": word_similarity(&normalized_given, &normalized_reference),
                    "status": if is_correct { "Correct" } else { "Incorrect" },
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

    fn content() -> DictationContent {
        DictationContent::parse(&json!({
            "sentences": ["Le chat dort sur le lit.", {"text": "Il fait beau."}],
            "audio_files": ["/uploads/dictation/1.mp3", null]
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_sentence_objects_and_audio() {
        let c = content();
        assert_eq!(c.sentences[1], "Il fait beau.");
        assert_eq!(c.audio_files[1], None);
    }

    #[test]
    fn test_punctuation_and_case_ignored() {
        let sheet = AnswerSheet::new()
            .with("dictation_answer_0", "le chat  dort sur le lit")
            .with("dictation_answer_1", "Il fait chaud");
        let evaluation = content().grade(&sheet);
        assert_eq!(evaluation.correct_count, 1);
        let details = evaluation.details();
        assert_eq!(details[0]["similarity"], 100.0);
        assert_eq!(details[1]["similarity"], 66.7);
        assert_eq!(details[1]["status"], "Incorrect");
    }

    #[test]
    fn test_student_view_hides_sentences() {
        let view = content().student_view();
        assert!(view.get("sentences").is_none());
        assert_eq!(view["sentence_count"], 2);
        assert_eq!(view["audio_files"], json!(["/uploads/dictation/1.mp3", null]));
    }

    #[test]
    fn test_missing_sentences_rejected() {
        assert!(DictationContent::parse(&json!({"audio_files": ["/a.mp3"]})).is_err());
        assert!(DictationContent::parse(&json!({"sentences": []})).is_err());
    }
}
