pub mod entities;
pub mod requests;
pub mod responses;

pub use entities::{Exercise, ExerciseSummary};
pub use requests::{CreateExerciseRequest, ExerciseLibraryParams, ExerciseListQuery, UpdateExerciseRequest};
pub use responses::{ExerciseDetailResponse, ExerciseListResponse};
