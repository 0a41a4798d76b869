use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 一次作答
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../bindings/attempt.ts")]
pub struct ExerciseAttempt {
    pub id: i64,
    pub student_id: i64,
    pub exercise_id: i64,
    pub course_id: Option<i64>,
    // 百分制得分
    pub score: f64,
    // 规整后的提交内容
    pub answers: serde_json::Value,
    // 评分明细
    pub feedback: serde_json::Value,
    pub completed: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 单个学生在某练习上的进度
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../bindings/attempt.ts")]
pub struct AttemptProgress {
    pub attempts_count: i64,
    pub best_score: Option<f64>,
    pub last_score: Option<f64>,
    pub average_score: Option<f64>,
    pub last_attempt_at: Option<chrono::DateTime<chrono::Utc>>,
    /// 为空表示不限次数
    pub max_attempts: Option<i32>,
    pub remaining_attempts: Option<i32>,
}

impl AttemptProgress {
    /// 根据作答记录计算进度，记录顺序不限
    pub fn compute(attempts: &[ExerciseAttempt], max_attempts: Option<i32>) -> Self {
        let count = attempts.len() as i64;
        let last = attempts.iter().max_by_key(|a| (a.created_at, a.id));
        let best = attempts.iter().map(|a| a.score).reduce(f64::max);
        let average = if attempts.is_empty() {
            None
        } else {
            Some(attempts.iter().map(|a| a.score).sum::<f64>() / count as f64)
        };

        Self {
            attempts_count: count,
            best_score: best,
            last_score: last.map(|a| a.score),
            average_score: average,
            last_attempt_at: last.map(|a| a.created_at),
            max_attempts,
            remaining_attempts: max_attempts.map(|max| (max as i64 - count).max(0) as i32),
        }
    }

    pub fn limit_reached(&self) -> bool {
        self.remaining_attempts == Some(0)
    }
}

/// 练习整体统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../bindings/attempt.ts")]
pub struct AttemptSummary {
    pub total_attempts: i64,
    pub student_count: i64,
    pub average_score: Option<f64>,
    pub best_score: Option<f64>,
    pub lowest_score: Option<f64>,
}

impl AttemptSummary {
    pub fn compute(attempts: &[ExerciseAttempt]) -> Self {
        let students: std::collections::HashSet<i64> =
            attempts.iter().map(|a| a.student_id).collect();
        let scores = attempts.iter().map(|a| a.score);

        Self {
            total_attempts: attempts.len() as i64,
            student_count: students.len() as i64,
            average_score: if attempts.is_empty() {
                None
            } else {
                Some(scores.clone().sum::<f64>() / attempts.len() as f64)
            },
            best_score: scores.clone().reduce(f64::max),
            lowest_score: scores.reduce(f64::min),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn attempt(id: i64, student_id: i64, score: f64, ts: i64) -> ExerciseAttempt {
        ExerciseAttempt {
            id,
            student_id,
            exercise_id: 1,
            course_id: None,
            score,
            answers: serde_json::json!({}),
            feedback: serde_json::json!({}),
            completed: true,
            created_at: Utc.timestamp_opt(ts, 0).unwrap(),
        }
    }

    #[test]
    fn test_progress_without_attempts() {
        let progress = AttemptProgress::compute(&[], Some(3));
        assert_eq!(progress.attempts_count, 0);
        assert_eq!(progress.best_score, None);
        assert_eq!(progress.remaining_attempts, Some(3));
        assert!(!progress.limit_reached());
    }

    #[test]
    fn test_progress_tracks_last_and_best() {
        let attempts = vec![
            attempt(3, 7, 40.0, 300),
            attempt(1, 7, 50.0, 100),
            attempt(2, 7, 90.0, 200),
        ];
        let progress = AttemptProgress::compute(&attempts, Some(3));
        assert_eq!(progress.attempts_count, 3);
        assert_eq!(progress.best_score, Some(90.0));
        assert_eq!(progress.last_score, Some(40.0));
        assert_eq!(progress.average_score, Some(60.0));
        assert_eq!(progress.remaining_attempts, Some(0));
        assert!(progress.limit_reached());
    }

    #[test]
    fn test_progress_unlimited() {
        let progress = AttemptProgress::compute(&[attempt(1, 7, 10.0, 1)], None);
        assert_eq!(progress.max_attempts, None);
        assert_eq!(progress.remaining_attempts, None);
        assert!(!progress.limit_reached());
    }

    #[test]
    fn test_summary_counts_distinct_students() {
        let attempts = vec![
            attempt(1, 7, 100.0, 1),
            attempt(2, 7, 50.0, 2),
            attempt(3, 8, 0.0, 3),
        ];
        let summary = AttemptSummary::compute(&attempts);
        assert_eq!(summary.total_attempts, 3);
        assert_eq!(summary.student_count, 2);
        assert_eq!(summary.average_score, Some(50.0));
        assert_eq!(summary.best_score, Some(100.0));
        assert_eq!(summary.lowest_score, Some(0.0));
    }
}
