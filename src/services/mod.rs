//! 业务逻辑层
//!
//! 每个领域一个 Service，操作按文件拆分；
//! Service 从请求的 app_data 取存储句柄，便于测试时注入。

pub mod assignments;
pub mod auth;
pub mod chat;
pub mod course_users;
pub mod courses;
pub mod files;
pub mod grades;
pub mod submissions;

pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use chat::ChatService;
pub use course_users::CourseUserService;
pub use courses::CourseService;
pub use files::FileService;
pub use grades::GradeService;
pub use submissions::SubmissionService;
