pub(crate) mod access;
pub mod attempts;
pub mod auth;
pub mod classes;
pub mod courses;
pub mod exercises;
pub mod files;

pub use attempts::AttemptService;
pub use auth::AuthService;
pub use classes::ClassService;
pub use courses::CourseService;
pub use exercises::ExerciseService;
pub use files::FileService;
