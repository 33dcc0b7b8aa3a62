use std::collections::HashMap;

use serde::Deserialize;
use ts_rs::TS;

/// 评分请求：按评分点 id 给分
///
/// 每个评分点都必须给分，得分范围 [0, criterion.points]；
/// 总分由服务端聚合，客户端不提交总分。
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeSubmissionRequest {
    pub scores_by_criterion: HashMap<String, f64>,
    pub feedback: Option<String>,
    /// 查重相似度，0-100
    pub plagiarism_score: Option<f64>,
}

/// 评分列表查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub assignment_id: Option<i64>,
    pub submission_id: Option<i64>,
    pub grader_id: Option<i64>,
}
