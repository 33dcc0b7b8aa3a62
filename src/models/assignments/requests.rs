use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

use crate::models::assignments::entities::SubmissionType;
use crate::models::assignments::rubric::Rubric;
use crate::models::common::pagination::PaginationQuery;

/// 创建作业请求
///
/// total_points 仅作交叉检查：提供时必须等于评分标准推导出的总分。
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct CreateAssignmentRequest {
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub rubric: Rubric,
    pub total_points: Option<f64>,
    pub due_date: Option<DateTime<Utc>>, // ISO 8601 格式，如 "2026-09-01T12:00:00Z"
    pub submission_type: SubmissionType,
    #[serde(default)]
    pub allowed_extensions: Vec<String>,
    pub max_file_size: Option<i64>,
    #[serde(default)]
    pub allow_late: bool,
    #[serde(default)]
    pub allow_resubmission: bool,
}

/// 更新作业请求
///
/// 已发布作业的 rubric / total_points 变更会被拒绝。
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub rubric: Option<Rubric>,
    pub total_points: Option<f64>,
    pub due_date: Option<DateTime<Utc>>,
    pub submission_type: Option<SubmissionType>,
    pub allowed_extensions: Option<Vec<String>>,
    pub max_file_size: Option<i64>,
    pub allow_late: Option<bool>,
    pub allow_resubmission: Option<bool>,
}

/// 导入评分标准请求：原始 JSON 字符串，全量替换
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct ImportRubricRequest {
    pub rubric_json: String,
}

/// 作业列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub course_id: Option<i64>,
    pub created_by: Option<i64>,
    /// 学生视角默认只看已发布作业；教师可传 false 查看草稿
    pub published_only: Option<bool>,
    pub search: Option<String>,
}

// 用于存储层的内部查询参数
#[derive(Debug, Clone)]
pub struct AssignmentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub course_id: Option<i64>,
    pub created_by: Option<i64>,
    pub published_only: Option<bool>,
    pub search: Option<String>,
}

impl From<AssignmentListParams> for AssignmentListQuery {
    fn from(params: AssignmentListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            course_id: params.course_id,
            created_by: params.created_by,
            published_only: params.published_only,
            search: params.search,
        }
    }
}
