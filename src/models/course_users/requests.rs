use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::pagination::PaginationQuery;
use crate::models::course_users::entities::CourseUserRole;

/// 入班请求，入班码大小写不敏感
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course-user.ts")]
pub struct EnrollRequest {
    pub entry_code: String,
}

/// 课程成员列表查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course-user.ts")]
pub struct CourseUserQuery {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub role: Option<CourseUserRole>,
}
