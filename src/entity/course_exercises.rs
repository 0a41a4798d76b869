//! 课程与练习的关联

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "course_exercises")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub exercise_id: i64,
    pub added_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::exercises::Entity",
        from = "Column::ExerciseId",
        to = "super::exercises::Column::Id"
    )]
    Exercise,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::exercises::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exercise.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_course_exercise(self) -> crate::models::courses::entities::CourseExercise {
        crate::models::courses::entities::CourseExercise {
            course_id: self.course_id,
            exercise_id: self.exercise_id,
            added_at: super::to_datetime(self.added_at),
        }
    }
}
