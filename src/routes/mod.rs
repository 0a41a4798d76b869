pub mod attempts;

pub mod auth;

pub mod classes;

pub mod courses;

pub mod exercises;

pub mod files;

pub use attempts::configure_attempts_routes;
pub use auth::configure_auth_routes;
pub use classes::configure_classes_routes;
pub use courses::configure_courses_routes;
pub use exercises::configure_exercises_routes;
pub use files::configure_upload_routes;
