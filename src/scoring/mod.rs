//! 练习评分引擎
//!
//! 每种练习类型解析为一个强类型的 [`ExerciseDefinition`]，所有提交路径都经由 [`evaluate`] 评分。
//! 本模块不做任何 I/O。

mod answers;
mod blanks;
mod content;
mod dictation;
mod drag_and_drop;
mod flashcards;
mod labeling;
mod pairs;
mod qcm;
mod qcm_multichoix;
mod redact;
mod text;
mod underline;
mod word_search;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::errors::{ClassNumError, Result};

pub use answers::{AnswerSheet, FieldValue};
pub use blanks::{BlanksContent, OrderDirection, detect_ordering};
pub use dictation::DictationContent;
pub use drag_and_drop::DragAndDropContent;
pub use flashcards::FlashcardsContent;
pub use labeling::{LabelingContent, LegendMode};
pub use pairs::PairsContent;
pub use qcm::QcmContent;
pub use qcm_multichoix::MultichoixContent;
pub use redact::redact_answers;
pub use text::{blank_location, count_blanks, normalize_answer};
pub use underline::UnderlineContent;
pub use word_search::WordSearchContent;

/// 练习类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    Qcm,
    QcmMultichoix,
    FillInBlanks,
    WordPlacement,
    Pairs,
    DragAndDrop,
    WordSearch,
    ImageLabeling,
    Legend,
    Flashcards,
    Dictation,
    UnderlineWords,
}

impl ExerciseType {
    pub const ALL: [ExerciseType; 12] = [
        ExerciseType::Qcm,
        ExerciseType::QcmMultichoix,
        ExerciseType::FillInBlanks,
        ExerciseType::WordPlacement,
        ExerciseType::Pairs,
        ExerciseType::DragAndDrop,
        ExerciseType::WordSearch,
        ExerciseType::ImageLabeling,
        ExerciseType::Legend,
        ExerciseType::Flashcards,
        ExerciseType::Dictation,
        ExerciseType::UnderlineWords,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseType::Qcm => "qcm",
            ExerciseType::QcmMultichoix => "qcm_multichoix",
            ExerciseType::FillInBlanks => "fill_in_blanks",
            ExerciseType::WordPlacement => "word_placement",
            ExerciseType::Pairs => "pairs",
            ExerciseType::DragAndDrop => "drag_and_drop",
            ExerciseType::WordSearch => "word_search",
            ExerciseType::ImageLabeling => "image_labeling",
            ExerciseType::Legend => "legend",
            ExerciseType::Flashcards => "flashcards",
            ExerciseType::Dictation => "dictation",
            ExerciseType::UnderlineWords => "underline_words",
        }
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseType {
    type Err = ClassNumError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim();
        if normalized == "souligne_mots" {
            return Ok(ExerciseType::UnderlineWords);
        }
        ExerciseType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| {
                ClassNumError::unsupported_exercise_type(format!(
                    "Type d'exercice non supporté: '{s}'"
                ))
            })
    }
}

/// 评分选项
#[derive(Debug, Clone, Default)]
pub struct GradingOptions {
    /// 填空题忽略答案顺序
    pub order_insensitive_blanks: bool,
    /// 练习说明，用于识别“排序”类填空题
    pub description: Option<String>,
}

/// 评分结果
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// 百分制得分
    pub score: f64,
    pub correct_count: usize,
    pub total_count: usize,
    /// 规整后的提交记录
    pub answers: Value,
    /// `{score, score_count, max_score, details}`
    pub feedback: Value,
}

impl Evaluation {
    pub(crate) fn new(correct: usize, total: usize, answers: Value, details: Vec<Value>) -> Self {
        let score = score_percentage(correct, total);
        Self {
            score,
            correct_count: correct,
            total_count: total,
            answers,
            feedback: json!({
                "score": score,
                "score_count": correct,
                "max_score": total,
                "details": details,
            }),
        }
    }

    /// 在反馈中附加额外字段
    pub(crate) fn with_feedback(mut self, key: &str, value: Value) -> Self {
        if let Value::Object(map) = &mut self.feedback {
            map.insert(key.to_string(), value);
        }
        self
    }

    pub fn details(&self) -> &[Value] {
        self.feedback["details"]
            .as_array()
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// 百分比得分，总数为 0 时为 0
pub fn score_percentage(correct: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64 * 100.0
    }
}

/// 解析并校验后的练习内容
#[derive(Debug, Clone, PartialEq)]
pub enum ExerciseDefinition {
    Qcm(QcmContent),
    QcmMultichoix(MultichoixContent),
    FillInBlanks(BlanksContent),
    WordPlacement(BlanksContent),
    Pairs(PairsContent),
    DragAndDrop(DragAndDropContent),
    WordSearch(WordSearchContent),
    ImageLabeling(LabelingContent),
    Legend(LabelingContent),
    Flashcards(FlashcardsContent),
    Dictation(DictationContent),
    UnderlineWords(UnderlineContent),
}

impl ExerciseDefinition {
    /// 按类型解析内容，缺少必填字段时返回 `InvalidContent`
    pub fn parse(exercise_type: ExerciseType, content: &Value) -> Result<Self> {
        let name = exercise_type.as_str();
        content::as_object(content, name)?;

        Ok(match exercise_type {
            ExerciseType::Qcm => Self::Qcm(QcmContent::parse(content)?),
            ExerciseType::QcmMultichoix => Self::QcmMultichoix(MultichoixContent::parse(content)?),
            ExerciseType::FillInBlanks => Self::FillInBlanks(BlanksContent::parse_fill_in(content)?),
            ExerciseType::WordPlacement => {
                Self::WordPlacement(BlanksContent::parse_word_placement(content)?)
            }
            ExerciseType::Pairs => Self::Pairs(PairsContent::parse(content)?),
            ExerciseType::DragAndDrop => Self::DragAndDrop(DragAndDropContent::parse(content)?),
            ExerciseType::WordSearch => Self::WordSearch(WordSearchContent::parse(content)?),
            ExerciseType::ImageLabeling => {
                Self::ImageLabeling(LabelingContent::parse_image_labeling(content)?)
            }
            ExerciseType::Legend => Self::Legend(LabelingContent::parse_legend(content)?),
            ExerciseType::Flashcards => Self::Flashcards(FlashcardsContent::parse(content)?),
            ExerciseType::Dictation => Self::Dictation(DictationContent::parse(content)?),
            ExerciseType::UnderlineWords => {
                Self::UnderlineWords(UnderlineContent::parse(content)?)
            }
        })
    }

    /// 由类型字符串与内容直接解析
    pub fn parse_str(exercise_type: &str, content: &Value) -> Result<Self> {
        Self::parse(exercise_type.parse()?, content)
    }

    pub fn exercise_type(&self) -> ExerciseType {
        match self {
            Self::Qcm(_) => ExerciseType::Qcm,
            Self::QcmMultichoix(_) => ExerciseType::QcmMultichoix,
            Self::FillInBlanks(_) => ExerciseType::FillInBlanks,
            Self::WordPlacement(_) => ExerciseType::WordPlacement,
            Self::Pairs(_) => ExerciseType::Pairs,
            Self::DragAndDrop(_) => ExerciseType::DragAndDrop,
            Self::WordSearch(_) => ExerciseType::WordSearch,
            Self::ImageLabeling(_) => ExerciseType::ImageLabeling,
            Self::Legend(_) => ExerciseType::Legend,
            Self::Flashcards(_) => ExerciseType::Flashcards,
            Self::Dictation(_) => ExerciseType::Dictation,
            Self::UnderlineWords(_) => ExerciseType::UnderlineWords,
        }
    }
}

/// 唯一的评分入口
pub fn evaluate(
    definition: &ExerciseDefinition,
    sheet: &AnswerSheet,
    options: &GradingOptions,
) -> Evaluation {
    let evaluation = match definition {
        ExerciseDefinition::Qcm(c) => c.grade(sheet),
        ExerciseDefinition::QcmMultichoix(c) => c.grade(sheet),
        ExerciseDefinition::FillInBlanks(c) => c.grade_fill_in(sheet, options),
        ExerciseDefinition::WordPlacement(c) => c.grade_positional(sheet),
        ExerciseDefinition::Pairs(c) => c.grade(sheet),
        ExerciseDefinition::DragAndDrop(c) => c.grade(sheet),
        ExerciseDefinition::WordSearch(c) => c.grade(sheet),
        ExerciseDefinition::ImageLabeling(c) => c.grade(sheet, "label"),
        ExerciseDefinition::Legend(c) => c.grade(sheet, "legend"),
        ExerciseDefinition::Flashcards(c) => c.grade(sheet),
        ExerciseDefinition::Dictation(c) => c.grade(sheet),
        ExerciseDefinition::UnderlineWords(c) => c.grade(sheet),
    };

    tracing::debug!(
        "练习评分完成: type={}, correct={}/{}, score={:.2}",
        definition.exercise_type(),
        evaluation.correct_count,
        evaluation.total_count,
        evaluation.score
    );
    evaluation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exercise_type_round_trip() {
        for t in ExerciseType::ALL {
            assert_eq!(t.to_string().parse::<ExerciseType>().unwrap(), t);
        }
    }

    #[test]
    fn test_exercise_type_aliases_and_unknown() {
        assert_eq!(
            "souligne_mots".parse::<ExerciseType>().unwrap(),
            ExerciseType::UnderlineWords
        );
        let err = "crossword".parse::<ExerciseType>().unwrap_err();
        assert_eq!(err.code(), "E013");
    }

    #[test]
    fn test_score_percentage() {
        assert_eq!(score_percentage(2, 2), 100.0);
        assert_eq!(score_percentage(1, 4), 25.0);
        assert_eq!(score_percentage(0, 0), 0.0);
        assert!((score_percentage(1, 3) - 33.333_333).abs() < 1e-4);
    }

    #[test]
    fn test_parse_rejects_non_object_content() {
        let err = ExerciseDefinition::parse(ExerciseType::Qcm, &json!([1, 2])).unwrap_err();
        assert!(err.is_content_error());
    }

    #[test]
    fn test_two_blanks_both_correct_scores_full() {
        let content = json!({
            "sentences": ["Le ___ mange la ___."],
            "words": ["chat", "souris"]
        });
        let definition = ExerciseDefinition::parse_str("fill_in_blanks", &content).unwrap();
        let sheet = AnswerSheet::new()
            .with("answer_0", "chat")
            .with("answer_1", "souris");
        let evaluation = evaluate(&definition, &sheet, &GradingOptions::default());
        assert_eq!(evaluation.score, 100.0);
        assert_eq!(evaluation.feedback["max_score"], 2);
        assert_eq!(evaluation.feedback["score_count"], 2);
    }

    #[test]
    fn test_every_type_parses_and_grades_empty_sheet() {
        let fixtures = [
            ("qcm", json!({"questions": [{"text": "Q", "options": ["a", "b"], "correct": 0}]})),
            ("qcm_multichoix", json!({"questions": [{"text": "Q", "options": ["a", "b"], "correct_options": [0]}]})),
            ("fill_in_blanks", json!({"text": "Un ___.", "words": ["mot"]})),
            ("word_placement", json!({"sentences": ["Un ___."], "answers": ["mot"]})),
            ("pairs", json!({"pairs": [{"left": "a", "right": "b"}]})),
            ("drag_and_drop", json!({"draggable_items": ["x", "y"], "correct_order": [1, 0]})),
            ("word_search", json!({"words": ["CHAT"]})),
            ("image_labeling", json!({"zones": [{"label": "tête", "x": 1, "y": 2}]})),
            ("legend", json!({"mode": "classic", "zones": [{"legend": "bras"}]})),
            ("flashcards", json!({"cards": [{"question": "2+2", "answer": "4"}]})),
            ("dictation", json!({"sentences": ["Le chat dort."]})),
            ("underline_words", json!({"sentences": [{"text": "Le chat dort.", "words_to_underline": ["chat"]}]})),
        ];

        for (name, content) in fixtures {
            let definition = ExerciseDefinition::parse_str(name, &content)
                .unwrap_or_else(|e| panic!("{name}: {e}"));
            assert_eq!(definition.exercise_type().as_str(), name);
            let evaluation = evaluate(&definition, &AnswerSheet::new(), &GradingOptions::default());
            assert_eq!(evaluation.score, 0.0, "{name}");
            assert!(evaluation.total_count > 0, "{name}");
        }
    }
}
