pub mod entities;
pub mod requests;
pub mod responses;

pub use entities::{Class, ClassStudent};
pub use requests::{ClassListQuery, ClassQueryParams, CreateClassRequest, JoinClassRequest, UpdateClassRequest};
pub use responses::{ClassDetailResponse, ClassListResponse, ClassStudentListResponse};
