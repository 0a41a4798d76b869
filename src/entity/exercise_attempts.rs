//! 答题记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exercise_attempts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub exercise_id: i64,
    pub course_id: Option<i64>,
    #[sea_orm(column_type = "Double")]
    pub score: f64,
    #[sea_orm(column_type = "Text")]
    pub answers: String,
    #[sea_orm(column_type = "Text")]
    pub feedback: String,
    pub completed: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::exercises::Entity",
        from = "Column::ExerciseId",
        to = "super::exercises::Column::Id"
    )]
    Exercise,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::exercises::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exercise.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_attempt(self) -> crate::models::attempts::entities::ExerciseAttempt {
        use serde_json::Value;

        crate::models::attempts::entities::ExerciseAttempt {
            id: self.id,
            student_id: self.student_id,
            exercise_id: self.exercise_id,
            course_id: self.course_id,
            score: self.score,
            answers: serde_json::from_str(&self.answers).unwrap_or(Value::Null),
            feedback: serde_json::from_str(&self.feedback).unwrap_or(Value::Null),
            completed: self.completed,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
