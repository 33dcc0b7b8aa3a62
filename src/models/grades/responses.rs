use serde::Serialize;
use ts_rs::TS;

use crate::models::PaginationInfo;
use crate::models::grades::entities::Grade;

/// 评分列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeListResponse {
    pub items: Vec<Grade>,
    pub pagination: PaginationInfo,
}
