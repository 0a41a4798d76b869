//! 课程附件实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "course_files")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub uploaded_by: i64,
    pub original_name: String,
    pub stored_name: String,
    pub content_type: String,
    pub file_size: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_course_file(self) -> crate::models::files::entities::CourseFile {
        crate::models::files::entities::CourseFile {
            id: self.id,
            course_id: self.course_id,
            uploaded_by: self.uploaded_by,
            original_name: self.original_name,
            stored_name: self.stored_name,
            content_type: self.content_type,
            file_size: self.file_size,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
