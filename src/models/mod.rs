//! 数据模型定义
//!
//! 按领域分组：每个领域下分 entities / requests / responses。
//! `common` 中是跨领域共享的响应包装和分页类型。

pub mod assignments;
pub mod auth;
pub mod chat;
pub mod common;
pub mod course_users;
pub mod courses;
pub mod files;
pub mod grades;
pub mod submissions;
pub mod users;

pub use common::pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 业务错误码，随 ApiResponse 返回给客户端
///
/// 0 表示成功；1xxx 通用；2xxx 认证与用户；3xxx 课程与选课；
/// 4xxx 作业与评分标准；5xxx 提交；6xxx 评分；7xxx 文件；8xxx AI 聊天。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/error-code.ts")]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1001,
    MalformedJson = 1002,
    MalformedQuery = 1003,
    Unauthorized = 1004,
    Forbidden = 1005,
    NotFound = 1006,
    Conflict = 1007,
    RateLimitExceeded = 1008,
    InternalServerError = 1009,

    AuthFailed = 2001,
    RegisterFailed = 2002,
    TokenInvalid = 2003,
    UserNotFound = 2101,
    UserAlreadyExists = 2102,
    UserEmailInvalid = 2103,
    UserNameInvalid = 2104,
    UserPasswordInvalid = 2105,

    CourseNotFound = 3001,
    CourseAlreadyExists = 3002,
    CourseCreationFailed = 3003,
    CourseUpdateFailed = 3004,
    CourseDeleteFailed = 3005,
    EntryCodeInvalid = 3101,
    AlreadyEnrolled = 3102,
    EnrollFailed = 3103,
    CoursePermissionDenied = 3104,
    CourseMemberNotFound = 3105,

    AssignmentNotFound = 4001,
    AssignmentCreationFailed = 4002,
    AssignmentUpdateFailed = 4003,
    AssignmentDeleteFailed = 4004,
    AssignmentNotPublished = 4101,
    AssignmentDeadlinePassed = 4102,
    RubricInvalid = 4201,
    RubricMalformed = 4202,
    RubricLocked = 4203,

    SubmissionNotFound = 5001,
    SubmissionCreationFailed = 5002,
    AlreadySubmitted = 5101,
    SubmissionTypeNotAllowed = 5102,
    SubmissionStatusInvalid = 5103,

    GradeNotFound = 6001,
    GradeInvalid = 6101,
    GradeConflict = 6102,

    FileNotFound = 7001,
    FileUploadFailed = 7002,
    FileSizeExceeded = 7003,
    FileTypeNotAllowed = 7004,
    MultifileUploadNotAllowed = 7005,

    ChatUpstreamError = 8001,
}

/// 程序启动时间，用于运行时长统计
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
