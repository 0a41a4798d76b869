pub mod entities;
pub mod requests;
pub mod responses;

pub use entities::{AttemptProgress, AttemptSummary, ExerciseAttempt};
pub use requests::{AttemptStatsParams, NewExerciseAttempt, SubmitAttemptRequest};
pub use responses::{AttemptListResponse, ExerciseStatsResponse, StudentProgress, SubmitAttemptResponse};
