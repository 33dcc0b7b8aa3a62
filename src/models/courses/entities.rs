use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct Course {
    // 课程ID
    pub id: i64,
    // 课程编号，如 "CS101"
    pub course_number: String,
    // 课程名称
    pub course_name: String,
    // 学期，如 "Fall"
    pub term: String,
    // 学年
    pub year: i32,
    // 开课院系
    pub department: Option<String>,
    // 课程描述
    pub description: Option<String>,
    // 授课教师ID
    pub instructor_id: i64,
    // 选课入班码，全局唯一，生成时即为大写
    pub entry_code: String,
    // 开课日期
    pub start_date: chrono::DateTime<chrono::Utc>,
    // 结课日期，必须晚于开课日期
    pub end_date: chrono::DateTime<chrono::Utc>,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 更新时间
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
