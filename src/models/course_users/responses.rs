use serde::Serialize;
use ts_rs::TS;

use crate::models::PaginationInfo;
use crate::models::course_users::entities::CourseUserRole;

/// 课程成员列表项（带用户公开信息）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course-user.ts")]
pub struct CourseUserListItem {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub role: CourseUserRole,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

/// 课程成员列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course-user.ts")]
pub struct CourseUserListResponse {
    pub items: Vec<CourseUserListItem>,
    pub pagination: PaginationInfo,
}
