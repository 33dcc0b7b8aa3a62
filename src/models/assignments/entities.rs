use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::assignments::rubric::Rubric;

// 提交类型
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub enum SubmissionType {
    Text, // 仅在线文本
    File, // 仅附件
    Both, // 文本加附件
}

impl SubmissionType {
    pub fn allows_text(&self) -> bool {
        matches!(self, SubmissionType::Text | SubmissionType::Both)
    }

    pub fn allows_files(&self) -> bool {
        matches!(self, SubmissionType::File | SubmissionType::Both)
    }
}

impl<'de> Deserialize<'de> for SubmissionType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for SubmissionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionType::Text => write!(f, "text"),
            SubmissionType::File => write!(f, "file"),
            SubmissionType::Both => write!(f, "both"),
        }
    }
}

impl std::str::FromStr for SubmissionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(SubmissionType::Text),
            "file" => Ok(SubmissionType::File),
            "both" => Ok(SubmissionType::Both),
            _ => Err(format!(
                "无效的提交类型: '{s}'. 支持的类型: text, file, both"
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    // 唯一 ID
    pub id: i64,
    // 关联的课程 ID
    pub course_id: i64,
    // 作业标题
    pub title: String,
    // 作业描述
    pub description: Option<String>,
    // 评分标准；总分始终由其推导
    pub rubric: Rubric,
    // 作业总分（= rubric.total_points()，冗余存储便于列表查询）
    pub total_points: f64,
    // 截止时间
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    // 提交类型
    pub submission_type: SubmissionType,
    // 允许的附件扩展名（如 ".pdf"），空表示跟随全局配置
    pub allowed_extensions: Vec<String>,
    // 单附件大小上限（字节），空表示跟随全局配置
    pub max_file_size: Option<i64>,
    // 是否允许迟交（迟交记为 is_late，不拒绝）
    pub allow_late: bool,
    // 是否允许重复提交（生成新版本）
    pub allow_resubmission: bool,
    // 发布状态；未发布的作业不接受提交，发布后评分标准锁定
    pub published: bool,
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
    // 创建者 ID
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
