pub mod cors;
pub mod extractor;
pub mod file_magic;
pub mod jwt;
pub mod parameter_error_handler;
pub mod password;
pub mod random_code;
pub mod sql;
pub mod validate;

pub use cors::build_cors;
pub use extractor::{
    SafeAttemptIdI64, SafeClassIdI64, SafeCourseIdI64, SafeExerciseIdI64, SafeFileIdI64, SafeIDI64,
    SafeStudentIdI64, SafeUploadPath,
};
pub use file_magic::validate_magic_bytes;
pub use parameter_error_handler::{json_error_handler, query_error_handler};
pub use sql::{escape_like_pattern, search_pattern};
