pub mod entities;
pub mod requests;
pub mod responses;

pub use entities::CourseFile;
pub use requests::{ImageUploadQuery, NewCourseFile};
pub use responses::{CourseFileUploadResponse, ImageUploadResponse};
