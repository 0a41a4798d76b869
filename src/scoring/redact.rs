//! 学生视角下隐藏练习内容中的答案
//!
//! 先按类型解析内容，再从原始 JSON 中去掉答案字段，并用解析结果生成不含对应关系的展示字段。
//! 无法解析的内容不下发。

use serde_json::{Map, Value};
use tracing::warn;

use super::{ExerciseDefinition, ExerciseType};

/// 所有类型通用的答案字段
const ANSWER_KEYS: &[&str] = &[
    "correct",
    "correct_answer",
    "correct_answers",
    "correct_options",
    "correct_order",
    "correct_pairs",
    "answers",
    "words_to_underline",
];

fn strip(value: &mut Value, keys: &[&str]) {
    match value {
        Value::Object(map) => {
            for key in keys {
                map.remove(*key);
            }
            map.values_mut().for_each(|v| strip(v, keys));
        }
        Value::Array(items) => items.iter_mut().for_each(|v| strip(v, keys)),
        _ => {}
    }
}

/// 删除 `removed` 中的字段后写入 `view` 的字段
fn replace_fields(target: &mut Value, removed: &[&str], view: Value) {
    let Value::Object(map) = target else {
        return;
    };
    for key in removed {
        map.remove(*key);
    }
    if let Value::Object(fields) = view {
        map.extend(fields);
    }
}

fn student_content(definition: &ExerciseDefinition, content: &Value) -> Value {
    let mut redacted = content.clone();
    strip(&mut redacted, ANSWER_KEYS);

    match definition {
        ExerciseDefinition::Flashcards(_) => {
            if let Some(cards) = redacted.get_mut("cards").and_then(Value::as_array_mut) {
                for card in cards.iter_mut().filter_map(Value::as_object_mut) {
                    card.remove("answer");
                    card.remove("back");
                }
            }
        }
        ExerciseDefinition::Dictation(c) => {
            replace_fields(&mut redacted, &["sentences"], c.student_view());
        }
        ExerciseDefinition::ImageLabeling(c) | ExerciseDefinition::Legend(c) => {
            replace_fields(
                &mut redacted,
                &["zones", "labels", "elements", "image"],
                c.student_view(),
            );
        }
        ExerciseDefinition::Pairs(c) => {
            if let Some(view) = c.student_view(content) {
                replace_fields(&mut redacted, &["pairs"], view);
            }
        }
        ExerciseDefinition::FillInBlanks(c) => {
            let mut view = Map::new();
            view.insert("words".to_string(), serde_json::json!(c.word_bank()));
            replace_fields(
                &mut redacted,
                &["words", "available_words"],
                Value::Object(view),
            );
        }
        _ => {}
    }
    redacted
}

/// 返回去除答案后的内容副本
pub fn redact_answers(exercise_type: ExerciseType, content: &Value) -> Value {
    match ExerciseDefinition::parse(exercise_type, content) {
        Ok(definition) => student_content(&definition, content),
        Err(e) => {
            warn!("练习内容无法解析，不下发给学生: type={}, {}", exercise_type, e);
            Value::Null
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{AnswerSheet, GradingOptions, evaluate};
    use serde_json::json;

    #[test]
    fn test_nested_answer_keys_removed() {
        let content = json!({
            "questions": [
                {"text": "Q1", "options": ["a", "b"], "correct": 1},
                {"text": "Q2", "options": ["a", "b"], "correct_answer": 0}
            ],
            "answers": ["x"]
        });
        let redacted = redact_answers(ExerciseType::Qcm, &content);
        assert!(redacted.get("answers").is_none());
        assert!(redacted["questions"][0].get("correct").is_none());
        assert!(redacted["questions"][1].get("correct_answer").is_none());
        assert_eq!(redacted["questions"][0]["options"], json!(["a", "b"]));
    }

    #[test]
    fn test_flashcard_answers_removed() {
        let content = json!({"cards": [{"question": "2+2", "answer": "4"}]});
        let redacted = redact_answers(ExerciseType::Flashcards, &content);
        assert!(redacted["cards"][0].get("answer").is_none());
        assert_eq!(redacted["cards"][0]["question"], "2+2");
    }

    #[test]
    fn test_unparseable_content_is_withheld() {
        let content = json!({"cards": [{"question": "2+2", "answer": "4"}]});
        assert_eq!(redact_answers(ExerciseType::Dictation, &content), Value::Null);
    }

    #[test]
    fn test_dictation_sentences_withheld() {
        let content = json!({
            "title": "Dictée 1",
            "sentences": ["Le chat dort.", "Il pleut."],
            "audio_files": ["/uploads/dictation/a.mp3", "/uploads/dictation/b.mp3"]
        });
        let redacted = redact_answers(ExerciseType::Dictation, &content);
        assert!(redacted.get("sentences").is_none());
        assert!(!redacted.to_string().contains("Le chat dort"));
        assert_eq!(redacted["title"], "Dictée 1");
        assert_eq!(redacted["sentence_count"], 2);
        assert_eq!(redacted["audio_files"][1], "/uploads/dictation/b.mp3");
    }

    #[test]
    fn test_image_labeling_labels_detached_from_zones() {
        let content = json!({
            "main_image": "/uploads/image_labeling/corps.png",
            "zones": [
                {"x": 10, "y": 20, "label": "Tête"},
                {"x": 30, "y": 40, "label": "Bras"},
                {"x": 50, "y": 60, "label": "Jambe"}
            ]
        });
        let redacted = redact_answers(ExerciseType::ImageLabeling, &content);
        let zones = redacted["zones"].as_array().unwrap();
        assert_eq!(zones.len(), 3);
        assert!(zones.iter().all(|z| z.get("label").is_none()));
        assert_eq!(zones[1]["x"], 30.0);
        assert_eq!(redacted["main_image"], "/uploads/image_labeling/corps.png");
        assert_eq!(redacted["labels"].as_array().unwrap().len(), 3);
        assert_ne!(redacted["labels"], json!(["Tête", "Bras", "Jambe"]));
    }

    #[test]
    fn test_legend_elements_replaced() {
        let content = json!({
            "mode": "grid",
            "elements": [{"legend": "racine"}, {"legend": "tige"}]
        });
        let redacted = redact_answers(ExerciseType::Legend, &content);
        assert!(redacted.get("elements").is_none());
        assert_eq!(redacted["mode"], "grid");
        assert!(redacted["zones"][0].get("legend").is_none());
        assert_eq!(redacted["labels"], json!(["tige", "racine"]));
    }

    #[test]
    fn test_pairs_columns_not_aligned() {
        let content = json!({
            "pairs": [
                {"left": "chien", "right": "aboie"},
                {"left": "chat", "right": "miaule"},
                {"left": "vache", "right": "meugle"}
            ]
        });
        let redacted = redact_answers(ExerciseType::Pairs, &content);
        assert!(redacted.get("pairs").is_none());
        assert_eq!(redacted["left_items"], json!(["chien", "chat", "vache"]));
        let right = redacted["right_items"].as_array().unwrap();
        assert_ne!(right, &vec![json!("aboie"), json!("miaule"), json!("meugle")]);

        // 按展示位置作答才能得满分
        let position = |word: &str| right.iter().position(|r| r == word).unwrap() as i64;
        let sheet = AnswerSheet::new()
            .with("left_0", position("aboie"))
            .with("left_1", position("miaule"))
            .with("left_2", position("meugle"));
        let definition = ExerciseDefinition::parse(ExerciseType::Pairs, &content).unwrap();
        let evaluation = evaluate(&definition, &sheet, &GradingOptions::default());
        assert_eq!(evaluation.score, 100.0);
    }

    #[test]
    fn test_fill_in_word_bank_shuffled() {
        let content = json!({
            "sentences": ["Le ___ mange la ___ dans la ___."],
            "words": ["chat", "souris", "cuisine"]
        });
        let redacted = redact_answers(ExerciseType::FillInBlanks, &content);
        let words = redacted["words"].as_array().unwrap();
        assert_eq!(words.len(), 3);
        assert_ne!(words, &vec![json!("chat"), json!("souris"), json!("cuisine")]);
    }

    #[test]
    fn test_underline_parallel_words_removed() {
        let content = json!({
            "sentences": ["Le chat dort.", "Il pleut."],
            "words_to_underline": [["chat"], ["pleut"]]
        });
        let redacted = redact_answers(ExerciseType::UnderlineWords, &content);
        assert!(redacted.get("words_to_underline").is_none());
        assert_eq!(redacted["sentences"][1], "Il pleut.");
    }
}
