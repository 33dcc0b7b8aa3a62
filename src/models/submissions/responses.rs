use serde::Serialize;
use ts_rs::TS;

use crate::models::PaginationInfo;
use crate::models::submissions::entities::{Submission, SubmissionStatus};
use crate::models::users::responses::UserBrief;

/// 提交列表项（带提交者公开信息）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionListItem {
    pub id: i64,
    pub assignment_id: i64,
    pub student: UserBrief,
    pub version: i32,
    pub status: SubmissionStatus,
    pub is_late: bool,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

/// 提交列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionListResponse {
    pub items: Vec<SubmissionListItem>,
    pub pagination: PaginationInfo,
}

/// 概览中的最新提交信息
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct LatestSubmissionInfo {
    pub id: i64,
    pub version: i32,
    pub status: SubmissionStatus,
    pub is_late: bool,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

/// 概览中的评分信息
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionGradeInfo {
    pub score: f64,
    pub feedback: Option<String>,
    pub graded_at: chrono::DateTime<chrono::Utc>,
}

/// 作业提交概览项（按学生聚合，取最新版本）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionSummaryItem {
    pub student: UserBrief,
    pub latest_submission: LatestSubmissionInfo,
    pub grade: Option<SubmissionGradeInfo>,
    pub total_versions: i32,
}

/// 作业提交概览响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionSummaryResponse {
    pub items: Vec<SubmissionSummaryItem>,
    pub pagination: PaginationInfo,
}

/// 提交详情响应（提交 + 可见的评分）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionDetailResponse {
    #[serde(flatten)]
    #[ts(flatten)]
    pub submission: Submission,
    pub grade: Option<crate::models::grades::entities::Grade>,
}
