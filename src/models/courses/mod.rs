pub mod entities;
pub mod requests;
pub mod responses;

pub use entities::{Course, CourseExercise};
pub use requests::{AttachExerciseRequest, CreateCourseRequest, UpdateCourseRequest};
pub use responses::{AvailableExercisesResponse, CourseDetailResponse};
