//! 图片标注题与图例题
//!
//! 两者评分方式相同：`user_answers` 对象把 "1".."n" 映射到标签，逐区域比较。

use serde_json::{Value, json};

use super::content::{display_order, field, first_non_empty_array, item_text, opt_string};
use super::text::normalize_answer;
use super::{AnswerSheet, Evaluation};
use crate::errors::{ClassNumError, Result};

/// 图例题的展示模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendMode {
    Classic,
    Grid,
    Spatial,
}

impl LegendMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Grid => "grid",
            Self::Spatial => "spatial",
        }
    }

    fn parse(value: Option<&str>) -> Result<Self> {
        match value.unwrap_or("classic") {
            "classic" => Ok(Self::Classic),
            "grid" => Ok(Self::Grid),
            "spatial" => Ok(Self::Spatial),
            other => Err(ClassNumError::invalid_content(format!(
                "legend: mode '{other}' inconnu (classic, grid, spatial)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelZone {
    /// 没有期望标签的区域不参与评分
    pub label: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelingContent {
    pub main_image: Option<String>,
    pub mode: Option<LegendMode>,
    pub zones: Vec<LabelZone>,
}

fn parse_zones(items: &[Value], label_keys: &[&str]) -> Vec<LabelZone> {
    items
        .iter()
        .map(|zone| LabelZone {
            label: field(zone, label_keys)
                .map(item_text)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            x: zone.get("x").and_then(Value::as_f64),
            y: zone.get("y").and_then(Value::as_f64),
        })
        .collect()
}

impl LabelingContent {
    pub fn parse_image_labeling(content: &Value) -> Result<Self> {
        let zones = first_non_empty_array(content, &["zones", "labels"]).ok_or_else(|| {
            ClassNumError::invalid_content("image_labeling: champ 'zones' manquant ou vide")
        })?;
        Ok(Self {
            main_image: opt_string(content, &["main_image", "image"]),
            mode: None,
            zones: parse_zones(zones, &["label", "legend"]),
        })
    }

    pub fn parse_legend(content: &Value) -> Result<Self> {
        let mode = LegendMode::parse(content.get("mode").and_then(Value::as_str))?;
        let zones = first_non_empty_array(content, &["zones", "elements"]).ok_or_else(|| {
            ClassNumError::invalid_content("legend: champ 'zones' ou 'elements' manquant ou vide")
        })?;
        let zones = parse_zones(zones, &["legend", "label"]);
        if zones.iter().all(|z| z.label.is_none()) {
            return Err(ClassNumError::invalid_content(
                "legend: aucune zone n'a de légende attendue",
            ));
        }
        Ok(Self {
            main_image: opt_string(content, &["main_image", "image"]),
            mode: Some(mode),
            zones,
        })
    }

    /// 学生端内容：区域只保留坐标，标签打乱后单独成为候选列表
    pub fn student_view(&self) -> Value {
        let zones: Vec<Value> = self
            .zones
            .iter()
            .enumerate()
            .map(|(i, zone)| json!({ "zone_id": i + 1, "x": zone.x, "y": zone.y }))
            .collect();

        let mut labels: Vec<String> = Vec::new();
        for label in self.zones.iter().filter_map(|z| z.label.as_ref()) {
            if !labels.contains(label) {
                labels.push(label.clone());
            }
        }
        let labels: Vec<&String> = display_order(&labels).into_iter().map(|i| &labels[i]).collect();

        let mut view = json!({
            "main_image": self.main_image,
            "zones": zones,
            "labels": labels,
        });
        if let Some(mode) = self.mode {
            view["mode"] = json!(mode.as_str());
        }
        view
    }

    /// 第 n 个区域（从 1 开始）的学生答案
    fn user_label(sheet: &AnswerSheet, answers: Option<&serde_json::Map<String, Value>>, zone_number: usize, fallback_prefix: &str) -> String {
        answers
            .and_then(|map| map.get(&zone_number.to_string()))
            .map(item_text)
            .or_else(|| sheet.text(&format!("zone_{}", zone_number - 1)))
            .or_else(|| sheet.text(&format!("{fallback_prefix}_{}", zone_number - 1)))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }

    pub fn grade(&self, sheet: &AnswerSheet, fallback_prefix: &str) -> Evaluation {
        let user_answers = sheet.object("user_answers");
        let mut correct_count = 0;
        let mut total = 0;
        let mut record = serde_json::Map::new();

        let details: Vec<Value> = self
            .zones
            .iter()
            .enumerate()
            .filter_map(|(i, zone)| {
                let expected = zone.label.as_deref()?;
                let zone_id = i + 1;
                let given = Self::user_label(sheet, user_answers.as_ref(), zone_id, fallback_prefix);
                record.insert(zone_id.to_string(), json!(given));

                total += 1;
                let is_correct = !given.is_empty() && normalize_answer(&given) == normalize_answer(expected);
                if is_correct {
                    correct_count += 1;
                }
                Some(json!({
                    "zone_id": zone_id,
                    "expected_label": expected,
                    "user_label": given,
                    "is_correct": is_correct,
                    "status": format!(
                        "Attendu: {expected}, Réponse: {}",
                        if given.is_empty() { "Vide" } else { given.as_str() }
                    ),
                }))
            })
            .collect();

        Evaluation::new(
            correct_count,
            total,
            json!({ "user_answers": record }),
            details,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_labeling_from_user_answers_object() {
        let content = LabelingContent::parse_image_labeling(&json!({
            "main_image": "/uploads/image_labeling/corps.png",
            "zones": [
                {"x": 10, "y": 20, "label": "Tête"},
                {"x": 30, "y": 40, "label": "Bras"},
                {"x": 50, "y": 60, "label": "Jambe"}
            ]
        }))
        .unwrap();
        let sheet = AnswerSheet::new().with("user_answers", r#"{"1": " tête ", "2": "jambe"}"#);
        let evaluation = content.grade(&sheet, "label");
        assert_eq!(evaluation.correct_count, 1);
        assert_eq!(evaluation.total_count, 3);
        let details = evaluation.details();
        assert_eq!(details[1]["status"], "Attendu: Bras, Réponse: jambe");
        assert_eq!(details[2]["status"], "Attendu: Jambe, Réponse: Vide");
    }

    #[test]
    fn test_zone_field_fallback() {
        let content = LabelingContent::parse_image_labeling(&json!({
            "zones": [{"label": "nord"}, {"label": "sud"}]
        }))
        .unwrap();
        let sheet = AnswerSheet::new().with("zone_0", "Nord").with("label_1", "sud");
        assert_eq!(content.grade(&sheet, "label").score, 100.0);
    }

    #[test]
    fn test_legend_skips_unlabelled_zones() {
        let content = LabelingContent::parse_legend(&json!({
            "mode": "grid",
            "elements": [{"legend": "racine"}, {"x": 1}, {"label": "feuille"}]
        }))
        .unwrap();
        assert_eq!(content.mode, Some(LegendMode::Grid));
        let sheet = AnswerSheet::new()
            .with("legend_0", "racine")
            .with("legend_2", "tige");
        let evaluation = content.grade(&sheet, "legend");
        assert_eq!(evaluation.total_count, 2);
        assert_eq!(evaluation.correct_count, 1);
        assert_eq!(evaluation.details()[1]["zone_id"], 3);
    }

    #[test]
    fn test_legend_validation() {
        assert!(LabelingContent::parse_legend(&json!({"mode": "3d", "zones": [{"legend": "a"}]})).is_err());
        assert!(LabelingContent::parse_legend(&json!({"zones": [{"x": 1}]})).is_err());
        assert!(LabelingContent::parse_image_labeling(&json!({"zones": []})).is_err());
    }

    #[test]
    fn test_student_view_separates_labels_from_zones() {
        let content = LabelingContent::parse_legend(&json!({
            "mode": "spatial",
            "image": "/uploads/legend/plante.png",
            "elements": [
                {"x": 12.5, "y": 40, "legend": "racine"},
                {"x": 30, "y": 10, "legend": "feuille"},
                {"x": 50, "y": 5, "legend": "fleur"}
            ]
        }))
        .unwrap();
        let view = content.student_view();
        assert_eq!(view["main_image"], "/uploads/legend/plante.png");
        assert_eq!(view["mode"], "spatial");
        assert_eq!(view["zones"][0], json!({"zone_id": 1, "x": 12.5, "y": 40.0}));
        for zone in view["zones"].as_array().unwrap() {
            assert!(zone.get("legend").is_none());
            assert!(zone.get("label").is_none());
        }

        let labels: Vec<&str> = view["labels"].as_array().unwrap().iter().filter_map(Value::as_str).collect();
        assert_eq!(labels.len(), 3);
        assert_ne!(labels, vec!["racine", "feuille", "fleur"]);
        assert!(labels.contains(&"feuille"));
    }
}
