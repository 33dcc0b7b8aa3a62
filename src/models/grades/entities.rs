use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 评分记录，与提交一一对应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct Grade {
    pub id: i64,
    pub submission_id: i64,
    pub grader_id: i64,
    // 总分 = 各评分点得分之和
    pub score: f64,
    // 按评分点 id 的得分明细
    pub criterion_scores: HashMap<String, f64>,
    pub feedback: Option<String>,
    // 查重相似度，0-100
    pub plagiarism_score: Option<f64>,
    pub graded_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
