//! 练习存储操作

use super::{SeaOrmStorage, like_search};
use crate::entity::exercises::{ActiveModel, Column, Entity as Exercises};
use crate::errors::{ClassNumError, Result};
use crate::models::{
    PaginationInfo,
    exercises::{
        entities::{Exercise, ExerciseSummary},
        requests::{CreateExerciseRequest, ExerciseListQuery, UpdateExerciseRequest},
        responses::ExerciseListResponse,
    },
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

/// 非正数视为不限次数
fn normalize_max_attempts(value: Option<i32>) -> Option<i32> {
    value.filter(|n| *n > 0)
}

impl SeaOrmStorage {
    /// 创建练习（内容已在服务层校验）
    pub async fn create_exercise_impl(
        &self,
        teacher_id: i64,
        req: CreateExerciseRequest,
    ) -> Result<Exercise> {
        let now = chrono::Utc::now().timestamp();
        let content = serde_json::to_string(&req.content)?;

        let model = ActiveModel {
            teacher_id: Set(teacher_id),
            title: Set(req.title),
            description: Set(req.description),
            exercise_type: Set(req.exercise_type),
            content: Set(content),
            subject: Set(req.subject),
            image_path: Set(req.image_path),
            max_attempts: Set(normalize_max_attempts(req.max_attempts)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("创建练习失败: {e}")))?;

        Ok(result.into_exercise())
    }

    /// 通过 ID 获取练习
    pub async fn get_exercise_by_id_impl(&self, exercise_id: i64) -> Result<Option<Exercise>> {
        let result = Exercises::find_by_id(exercise_id)
            .one(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("查询练习失败: {e}")))?;

        Ok(result.map(|m| m.into_exercise()))
    }

    /// 分页列出练习库
    pub async fn list_exercises_with_pagination_impl(
        &self,
        query: ExerciseListQuery,
    ) -> Result<ExerciseListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Exercises::find();

        // 创建者筛选
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }

        // 题型筛选
        if let Some(exercise_type) = query.exercise_type.filter(|t| !t.trim().is_empty()) {
            select = select.filter(Column::ExerciseType.eq(exercise_type.trim()));
        }

        // 学科筛选
        if let Some(subject) = query.subject.filter(|s| !s.trim().is_empty()) {
            select = select.filter(Column::Subject.eq(subject.trim()));
        }

        // 标题搜索
        if let Some(pattern) = like_search(query.search.as_deref()) {
            select = select.filter(Column::Title.like(pattern));
        }

        select = select.order_by_desc(Column::CreatedAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| ClassNumError::database_operation(format!("查询练习总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| ClassNumError::database_operation(format!("查询练习页数失败: {e}")))?;

        let exercises = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("查询练习列表失败: {e}")))?;

        Ok(ExerciseListResponse {
            items: exercises
                .into_iter()
                .map(|m| ExerciseSummary::from(&m.into_exercise()))
                .collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新练习
    pub async fn update_exercise_impl(
        &self,
        exercise_id: i64,
        update: UpdateExerciseRequest,
    ) -> Result<Option<Exercise>> {
        let existing = self.get_exercise_by_id_impl(exercise_id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(exercise_id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }

        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        if let Some(content) = update.content {
            model.content = Set(serde_json::to_string(&content)?);
        }

        if let Some(subject) = update.subject {
            model.subject = Set(Some(subject));
        }

        if let Some(image_path) = update.image_path {
            model.image_path = Set(Some(image_path));
        }

        if update.max_attempts.is_some() {
            model.max_attempts = Set(normalize_max_attempts(update.max_attempts));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("更新练习失败: {e}")))?;

        Ok(Some(result.into_exercise()))
    }

    /// 删除练习，课程关联与答题记录由外键级联删除
    pub async fn delete_exercise_impl(&self, exercise_id: i64) -> Result<bool> {
        let result = Exercises::delete_by_id(exercise_id)
            .exec(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("删除练习失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_max_attempts() {
        assert_eq!(normalize_max_attempts(Some(3)), Some(3));
        assert_eq!(normalize_max_attempts(Some(0)), None);
        assert_eq!(normalize_max_attempts(Some(-2)), None);
        assert_eq!(normalize_max_attempts(None), None);
    }
}
