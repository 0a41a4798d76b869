//! 班级成员存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::class_students::{ActiveModel, Column, Entity as ClassStudents};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{ClassNumError, Result};
use crate::models::classes::entities::ClassStudent;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 加入班级，重复加入由唯一索引拦截
    pub async fn join_class_impl(&self, class_id: i64, student_id: i64) -> Result<()> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            class_id: Set(class_id),
            student_id: Set(student_id),
            joined_at: Set(now),
            ..Default::default()
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("加入班级失败: {e}")))?;

        Ok(())
    }

    /// 学生是否在班级中
    pub async fn is_student_enrolled_impl(&self, class_id: i64, student_id: i64) -> Result<bool> {
        let count = ClassStudents::find()
            .filter(
                Condition::all()
                    .add(Column::ClassId.eq(class_id))
                    .add(Column::StudentId.eq(student_id)),
            )
            .count(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("查询班级成员失败: {e}")))?;

        Ok(count > 0)
    }

    /// 列出班级学生，按加入时间排序
    pub async fn list_class_students_impl(&self, class_id: i64) -> Result<Vec<ClassStudent>> {
        let memberships = ClassStudents::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::JoinedAt)
            .all(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("查询班级成员失败: {e}")))?;

        if memberships.is_empty() {
            return Ok(Vec::new());
        }

        let student_ids: Vec<i64> = memberships.iter().map(|m| m.student_id).collect();
        let users: HashMap<i64, _> = Users::find()
            .filter(UserColumn::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("查询学生信息失败: {e}")))?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let students = memberships
            .into_iter()
            .filter_map(|m| {
                let user = users.get(&m.student_id)?;
                Some(ClassStudent {
                    student_id: user.id,
                    username: user.username.clone(),
                    email: user.email.clone(),
                    display_name: user.display_name.clone(),
                    school_name: user.school_name.clone(),
                    joined_at: crate::entity::to_datetime(m.joined_at),
                })
            })
            .collect();

        Ok(students)
    }

    /// 班级学生数量
    pub async fn count_class_students_impl(&self, class_id: i64) -> Result<i64> {
        let count = ClassStudents::find()
            .filter(Column::ClassId.eq(class_id))
            .count(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("查询班级成员数量失败: {e}")))?;

        Ok(count as i64)
    }

    /// 移出学生
    pub async fn remove_class_student_impl(&self, class_id: i64, student_id: i64) -> Result<bool> {
        let result = ClassStudents::delete_many()
            .filter(
                Condition::all()
                    .add(Column::ClassId.eq(class_id))
                    .add(Column::StudentId.eq(student_id)),
            )
            .exec(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("移出学生失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
