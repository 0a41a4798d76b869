//! 练习实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exercises")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub teacher_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub exercise_type: String,
    // JSON 文本
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub subject: Option<String>,
    pub image_path: Option<String>,
    pub max_attempts: Option<i32>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::TeacherId",
        to = "super::users::Column::Id"
    )]
    Teacher,
    #[sea_orm(has_many = "super::course_exercises::Entity")]
    CourseExercises,
    #[sea_orm(has_many = "super::exercise_attempts::Entity")]
    ExerciseAttempts,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::course_exercises::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseExercises.def()
    }
}

impl Related<super::exercise_attempts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExerciseAttempts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_exercise(self) -> crate::models::exercises::entities::Exercise {
        // 历史数据中的非法 JSON 当作空内容处理
        let content = serde_json::from_str(&self.content).unwrap_or(serde_json::Value::Null);

        crate::models::exercises::entities::Exercise {
            id: self.id,
            teacher_id: self.teacher_id,
            title: self.title,
            description: self.description,
            exercise_type: self.exercise_type,
            content,
            subject: self.subject,
            image_path: self.image_path,
            max_attempts: self.max_attempts,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
