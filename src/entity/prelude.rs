//! 预导入模块，方便使用

pub use super::class_students::{
    ActiveModel as ClassStudentActiveModel, Entity as ClassStudents, Model as ClassStudentModel,
};
pub use super::classes::{ActiveModel as ClassActiveModel, Entity as Classes, Model as ClassModel};
pub use super::course_exercises::{
    ActiveModel as CourseExerciseActiveModel, Entity as CourseExercises,
    Model as CourseExerciseModel,
};
pub use super::course_files::{
    ActiveModel as CourseFileActiveModel, Entity as CourseFiles, Model as CourseFileModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::exercise_attempts::{
    ActiveModel as ExerciseAttemptActiveModel, Entity as ExerciseAttempts,
    Model as ExerciseAttemptModel,
};
pub use super::exercises::{
    ActiveModel as ExerciseActiveModel, Entity as Exercises, Model as ExerciseModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
