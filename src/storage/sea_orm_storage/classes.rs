//! 班级存储操作

use super::{SeaOrmStorage, like_search};
use crate::entity::class_students::{Column as ClassStudentColumn, Entity as ClassStudents};
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::errors::{ClassNumError, Result};
use crate::models::{
    PaginationInfo,
    classes::{
        entities::Class,
        requests::{ClassListQuery, ClassScope, CreateClassRequest, UpdateClassRequest},
        responses::ClassListResponse,
    },
};
use crate::utils::random_code::generate_access_code;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set,
};

/// 访问码冲突时的最大重试次数
const ACCESS_CODE_RETRIES: usize = 5;

impl SeaOrmStorage {
    /// 创建班级
    pub async fn create_class_impl(&self, teacher_id: i64, req: CreateClassRequest) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();
        let access_code = self.unique_access_code().await?;

        let model = ActiveModel {
            teacher_id: Set(teacher_id),
            name: Set(req.name),
            description: Set(req.description),
            access_code: Set(access_code),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("创建班级失败: {e}")))?;

        Ok(result.into_class())
    }

    async fn unique_access_code(&self) -> Result<String> {
        for _ in 0..ACCESS_CODE_RETRIES {
            let code = generate_access_code();
            if self.get_class_by_access_code_impl(&code).await?.is_none() {
                return Ok(code);
            }
        }
        Err(ClassNumError::database_operation("无法生成唯一的班级访问码"))
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 通过访问码获取班级
    pub async fn get_class_by_access_code_impl(&self, access_code: &str) -> Result<Option<Class>> {
        let result = Classes::find()
            .filter(Column::AccessCode.eq(access_code))
            .one(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 分页列出班级
    pub async fn list_classes_with_pagination_impl(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Classes::find();

        // 可见范围
        match query.scope {
            ClassScope::OwnedBy(teacher_id) => {
                select = select.filter(Column::TeacherId.eq(teacher_id));
            }
            ClassScope::EnrolledBy(student_id) => {
                select = select
                    .join(
                        JoinType::InnerJoin,
                        crate::entity::classes::Relation::ClassStudents.def(),
                    )
                    .filter(ClassStudentColumn::StudentId.eq(student_id));
            }
            ClassScope::All => {}
        }

        // 搜索条件
        if let Some(pattern) = like_search(query.search.as_deref()) {
            select = select.filter(Column::Name.like(pattern));
        }

        // 排序
        select = select.order_by_desc(Column::CreatedAt);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| ClassNumError::database_operation(format!("查询班级总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| ClassNumError::database_operation(format!("查询班级页数失败: {e}")))?;

        let classes = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(ClassListResponse {
            items: classes.into_iter().map(|m| m.into_class()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新班级信息
    pub async fn update_class_impl(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        // 先检查班级是否存在
        let existing = self.get_class_by_id_impl(class_id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(class_id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }

        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("更新班级失败: {e}")))?;

        Ok(Some(result.into_class()))
    }

    /// 删除班级，课程与成员由外键级联删除
    pub async fn delete_class_impl(&self, class_id: i64) -> Result<bool> {
        let result = Classes::delete_by_id(class_id)
            .exec(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("删除班级失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 学生已加入的班级 ID
    pub(crate) async fn enrolled_class_ids(&self, student_id: i64) -> Result<Vec<i64>> {
        let rows = ClassStudents::find()
            .filter(ClassStudentColumn::StudentId.eq(student_id))
            .all(&self.db)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("查询学生班级失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.class_id).collect())
    }
}
