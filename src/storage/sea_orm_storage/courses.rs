//! 课程与课程练习存储操作

use super::SeaOrmStorage;
use crate::entity::classes::{Column as ClassColumn, Entity as Classes};
use crate::entity::course_exercises::{
    ActiveModel as CourseExerciseActiveModel, Column as CourseExerciseColumn,
    Entity as CourseExercises,
};
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::entity::exercises::{Column as ExerciseColumn, Entity as Exercises};
use crate::errors::{ClassNumError, Result};
use crate::models::{
    courses::{
        entities::{Course, CourseExercise},
        requests::{CreateCourseRequest, UpdateCourseRequest},
    },
    exercises::entities::Exercise,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建课程
    pub async fn create_course_impl(&self, class_id: i64, req: CreateCourseRequest) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            class_id: Set(class_id),
            title: Set(req.title),
            content: Set(req.content),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("创建课程失败: {e}")))?;

        Ok(result.into_course())
    }

    /// 通过 ID 获取课程
    pub async fn get_course_by_id_impl(&self, course_id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 列出班级中的课程
    pub async fn list_courses_by_class_impl(&self, class_id: i64) -> Result<Vec<Course>> {
        let courses = Courses::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(courses.into_iter().map(|m| m.into_course()).collect())
    }

    /// 更新课程
    pub async fn update_course_impl(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        let existing = self.get_course_by_id_impl(course_id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(course_id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }

        if let Some(content) = update.content {
            model.content = Set(Some(content));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("更新课程失败: {e}")))?;

        Ok(Some(result.into_course()))
    }

    /// 删除课程
    pub async fn delete_course_impl(&self, course_id: i64) -> Result<bool> {
        let result = Courses::delete_by_id(course_id)
            .exec(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("删除课程失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 将练习关联到课程
    pub async fn attach_exercise_impl(
        &self,
        course_id: i64,
        exercise_id: i64,
    ) -> Result<CourseExercise> {
        let now = chrono::Utc::now().timestamp();

        let model = CourseExerciseActiveModel {
            course_id: Set(course_id),
            exercise_id: Set(exercise_id),
            added_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("关联练习失败: {e}")))?;

        Ok(result.into_course_exercise())
    }

    /// 取消关联
    pub async fn detach_exercise_impl(&self, course_id: i64, exercise_id: i64) -> Result<bool> {
        let result = CourseExercises::delete_many()
            .filter(
                Condition::all()
                    .add(CourseExerciseColumn::CourseId.eq(course_id))
                    .add(CourseExerciseColumn::ExerciseId.eq(exercise_id)),
            )
            .exec(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("取消关联练习失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 练习是否已关联到课程
    pub async fn is_exercise_attached_impl(&self, course_id: i64, exercise_id: i64) -> Result<bool> {
        let count = CourseExercises::find()
            .filter(
                Condition::all()
                    .add(CourseExerciseColumn::CourseId.eq(course_id))
                    .add(CourseExerciseColumn::ExerciseId.eq(exercise_id)),
            )
            .count(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("查询课程练习失败: {e}")))?;

        Ok(count > 0)
    }

    /// 课程中已关联的练习 ID，按添加顺序
    async fn course_exercise_ids(&self, course_id: i64) -> Result<Vec<i64>> {
        let rows = CourseExercises::find()
            .filter(CourseExerciseColumn::CourseId.eq(course_id))
            .order_by_asc(CourseExerciseColumn::AddedAt)
            .order_by_asc(CourseExerciseColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("查询课程练习失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.exercise_id).collect())
    }

    /// 列出课程中的练习
    pub async fn list_course_exercises_impl(&self, course_id: i64) -> Result<Vec<Exercise>> {
        let ids = self.course_exercise_ids(course_id).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut exercises: Vec<Exercise> = Exercises::find()
            .filter(ExerciseColumn::Id.is_in(ids.clone()))
            .all(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("查询练习失败: {e}")))?
            .into_iter()
            .map(|m| m.into_exercise())
            .collect();

        // 保持添加顺序
        exercises.sort_by_key(|e| ids.iter().position(|id| *id == e.id));
        Ok(exercises)
    }

    /// 教师自己的、尚未关联到该课程的练习
    pub async fn list_available_exercises_impl(
        &self,
        course_id: i64,
        teacher_id: i64,
    ) -> Result<Vec<Exercise>> {
        let attached = self.course_exercise_ids(course_id).await?;

        let mut select = Exercises::find().filter(ExerciseColumn::TeacherId.eq(teacher_id));
        if !attached.is_empty() {
            select = select.filter(ExerciseColumn::Id.is_not_in(attached));
        }

        let exercises = select
            .order_by_desc(ExerciseColumn::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("查询可用练习失败: {e}")))?;

        Ok(exercises.into_iter().map(|m| m.into_exercise()).collect())
    }

    /// 包含该练习的课程所属班级
    async fn class_ids_with_exercise(&self, exercise_id: i64) -> Result<Vec<i64>> {
        let course_ids: Vec<i64> = CourseExercises::find()
            .filter(CourseExerciseColumn::ExerciseId.eq(exercise_id))
            .all(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("查询课程练习失败: {e}")))?
            .into_iter()
            .map(|m| m.course_id)
            .collect();

        if course_ids.is_empty() {
            return Ok(Vec::new());
        }

        let class_ids = Courses::find()
            .filter(Column::Id.is_in(course_ids))
            .all(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("查询课程失败: {e}")))?
            .into_iter()
            .map(|m| m.class_id)
            .collect();

        Ok(class_ids)
    }

    /// 学生能否通过已加入班级的课程访问练习
    pub async fn student_can_access_exercise_impl(
        &self,
        student_id: i64,
        exercise_id: i64,
    ) -> Result<bool> {
        let class_ids = self.class_ids_with_exercise(exercise_id).await?;
        if class_ids.is_empty() {
            return Ok(false);
        }

        let enrolled = self.enrolled_class_ids(student_id).await?;
        Ok(class_ids.iter().any(|id| enrolled.contains(id)))
    }

    /// 教师名下班级的课程中是否包含该练习
    pub async fn teacher_has_exercise_in_courses_impl(
        &self,
        teacher_id: i64,
        exercise_id: i64,
    ) -> Result<bool> {
        let class_ids = self.class_ids_with_exercise(exercise_id).await?;
        if class_ids.is_empty() {
            return Ok(false);
        }

        let count = Classes::find()
            .filter(ClassColumn::Id.is_in(class_ids))
            .filter(ClassColumn::TeacherId.eq(teacher_id))
            .count(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(count > 0)
    }
}
