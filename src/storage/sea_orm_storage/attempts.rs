//! 答题记录存储操作

use super::SeaOrmStorage;
use crate::entity::exercise_attempts::{ActiveModel, Column, Entity as ExerciseAttempts};
use crate::errors::{ClassNumError, Result};
use crate::models::attempts::{ExerciseAttempt, NewExerciseAttempt};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 写入答题记录
    pub async fn create_attempt_impl(&self, attempt: NewExerciseAttempt) -> Result<ExerciseAttempt> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            student_id: Set(attempt.student_id),
            exercise_id: Set(attempt.exercise_id),
            course_id: Set(attempt.course_id),
            score: Set(attempt.score),
            answers: Set(serde_json::to_string(&attempt.answers)?),
            feedback: Set(serde_json::to_string(&attempt.feedback)?),
            completed: Set(true),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("保存答题记录失败: {e}")))?;

        Ok(result.into_attempt())
    }

    /// 通过 ID 获取答题记录
    pub async fn get_attempt_by_id_impl(&self, attempt_id: i64) -> Result<Option<ExerciseAttempt>> {
        let result = ExerciseAttempts::find_by_id(attempt_id)
            .one(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("查询答题记录失败: {e}")))?;

        Ok(result.map(|m| m.into_attempt()))
    }

    /// 学生某练习的全部记录，最新在前
    pub async fn list_student_attempts_impl(
        &self,
        student_id: i64,
        exercise_id: i64,
    ) -> Result<Vec<ExerciseAttempt>> {
        let attempts = ExerciseAttempts::find()
            .filter(
                Condition::all()
                    .add(Column::StudentId.eq(student_id))
                    .add(Column::ExerciseId.eq(exercise_id)),
            )
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("查询答题记录失败: {e}")))?;

        Ok(attempts.into_iter().map(|m| m.into_attempt()).collect())
    }

    /// 学生某练习的记录数
    pub async fn count_student_attempts_impl(&self, student_id: i64, exercise_id: i64) -> Result<i64> {
        let count = ExerciseAttempts::find()
            .filter(
                Condition::all()
                    .add(Column::StudentId.eq(student_id))
                    .add(Column::ExerciseId.eq(exercise_id)),
            )
            .count(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("统计答题次数失败: {e}")))?;

        Ok(count as i64)
    }

    /// 练习的全部记录，最新在前，可按课程筛选
    pub async fn list_exercise_attempts_impl(
        &self,
        exercise_id: i64,
        course_id: Option<i64>,
    ) -> Result<Vec<ExerciseAttempt>> {
        let mut select = ExerciseAttempts::find().filter(Column::ExerciseId.eq(exercise_id));

        if let Some(course_id) = course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }

        let attempts = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("查询答题记录失败: {e}")))?;

        Ok(attempts.into_iter().map(|m| m.into_attempt()).collect())
    }
}
