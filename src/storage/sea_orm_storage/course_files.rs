//! 课程附件存储操作

use super::SeaOrmStorage;
use crate::entity::course_files::{ActiveModel, Column, Entity as CourseFiles};
use crate::errors::{ClassNumError, Result};
use crate::models::files::{CourseFile, NewCourseFile};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 登记附件
    pub async fn create_course_file_impl(&self, file: NewCourseFile) -> Result<CourseFile> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(file.course_id),
            uploaded_by: Set(file.uploaded_by),
            original_name: Set(file.original_name),
            stored_name: Set(file.stored_name),
            content_type: Set(file.content_type),
            file_size: Set(file.file_size),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("登记课程附件失败: {e}")))?;

        Ok(result.into_course_file())
    }

    /// 通过 ID 获取附件
    pub async fn get_course_file_by_id_impl(&self, file_id: i64) -> Result<Option<CourseFile>> {
        let result = CourseFiles::find_by_id(file_id)
            .one(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("查询课程附件失败: {e}")))?;

        Ok(result.map(|m| m.into_course_file()))
    }

    /// 列出课程附件
    pub async fn list_course_files_impl(&self, course_id: i64) -> Result<Vec<CourseFile>> {
        let files = CourseFiles::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_asc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("查询课程附件失败: {e}")))?;

        Ok(files.into_iter().map(|m| m.into_course_file()).collect())
    }

    /// 删除附件记录（磁盘文件由服务层删除）
    pub async fn delete_course_file_impl(&self, file_id: i64) -> Result<bool> {
        let result = CourseFiles::delete_by_id(file_id)
            .exec(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("删除课程附件失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
