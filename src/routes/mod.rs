pub mod assignments;

pub mod auth;

pub mod chat;

pub mod course_users;

pub mod courses;

pub mod files;

pub mod grades;

pub mod submissions;

pub use assignments::configure_assignments_routes;
pub use auth::configure_auth_routes;
pub use chat::configure_chat_routes;
pub use course_users::configure_course_users_routes;
pub use courses::configure_courses_routes;
pub use files::configure_file_routes;
pub use grades::configure_grades_routes;
pub use submissions::configure_submissions_routes;
