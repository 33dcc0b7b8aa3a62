use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程内角色
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/course-user.ts")]
pub enum CourseUserRole {
    Student,           // 学生
    TeachingAssistant, // 助教
    Instructor,        // 教师
}

impl CourseUserRole {
    pub const STUDENT: &'static str = "student";
    pub const TEACHING_ASSISTANT: &'static str = "teaching_assistant";
    pub const INSTRUCTOR: &'static str = "instructor";

    pub fn course_instructor_roles() -> &'static [&'static CourseUserRole] {
        &[&Self::Instructor]
    }
    pub fn course_staff_roles() -> &'static [&'static CourseUserRole] {
        &[&Self::TeachingAssistant, &Self::Instructor]
    }
    pub fn all_roles() -> &'static [&'static CourseUserRole] {
        &[&Self::Student, &Self::TeachingAssistant, &Self::Instructor]
    }
}

impl<'de> Deserialize<'de> for CourseUserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            CourseUserRole::STUDENT => Ok(CourseUserRole::Student),
            CourseUserRole::TEACHING_ASSISTANT => Ok(CourseUserRole::TeachingAssistant),
            CourseUserRole::INSTRUCTOR => Ok(CourseUserRole::Instructor),
            _ => Err(serde::de::Error::custom(format!(
                "无效的课程成员角色: '{s}'. 支持的角色: student, teaching_assistant, instructor"
            ))),
        }
    }
}

impl std::fmt::Display for CourseUserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CourseUserRole::Student => write!(f, "{}", CourseUserRole::STUDENT),
            CourseUserRole::TeachingAssistant => {
                write!(f, "{}", CourseUserRole::TEACHING_ASSISTANT)
            }
            CourseUserRole::Instructor => write!(f, "{}", CourseUserRole::INSTRUCTOR),
        }
    }
}

impl std::str::FromStr for CourseUserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(CourseUserRole::Student),
            "teaching_assistant" => Ok(CourseUserRole::TeachingAssistant),
            "instructor" => Ok(CourseUserRole::Instructor),
            _ => Err(format!("Invalid course user role: {s}")),
        }
    }
}

/// 课程成员（选课记录），(course_id, user_id) 唯一
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course-user.ts")]
pub struct CourseUser {
    pub id: i64,
    pub course_id: i64,
    pub user_id: i64,
    pub role: CourseUserRole,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}
