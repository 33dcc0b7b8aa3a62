//! 评分标准（Rubric）核心模块
//!
//! 评分标准是一棵两层的树：有序的章节（section），每个章节下有序的
//! 评分点（criterion），均带分值。本模块负责：
//!
//! - 结构校验与归一化（`Rubric::validate`）：章节分值必须等于其评分点
//!   分值之和，作业总分始终由章节分值之和推导；
//! - 外部 JSON 导入（`Rubric::from_json`）：解析失败与结构失败分别映射
//!   到不同的错误类型，导入永远是全量替换，不存在部分生效；
//! - 按评分点聚合成绩（`Rubric::aggregate_scores`）：每个评分点的得分
//!   必须落在 [0, criterion.points] 区间，总分为各评分点得分之和，
//!   由构造保证不会超过作业总分。
//!
//! 所有函数都是纯函数，不触碰存储。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{CourseHubError, Result};

/// 浮点分值比较精度
const POINT_EPSILON: f64 = 1e-6;

/// 评分点：最小的可评分单元
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export, export_to = "../frontend/src/types/generated/rubric.ts")]
pub struct RubricCriterion {
    /// 稳定标识，评分请求通过它引用评分点；导入时缺省则按位置生成
    #[serde(default)]
    pub id: String,
    pub description: String,
    pub points: f64,
}

/// 评分章节
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export, export_to = "../frontend/src/types/generated/rubric.ts")]
pub struct RubricSection {
    pub title: String,
    pub points: f64,
    pub criteria: Vec<RubricCriterion>,
}

/// 完整的评分标准
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export, export_to = "../frontend/src/types/generated/rubric.ts")]
pub struct Rubric {
    pub sections: Vec<RubricSection>,
}

impl Rubric {
    /// 校验并归一化评分标准
    ///
    /// 校验规则：
    /// - 至少包含一个章节，每个章节至少包含一个评分点；
    /// - 章节标题、评分点描述非空；
    /// - 所有分值非负；
    /// - 章节声明的分值必须等于其评分点分值之和；
    /// - 评分点 id 在整个评分标准内唯一，缺省时按 `s{i}.c{j}` 生成。
    pub fn validate(mut self) -> Result<Self> {
        if self.sections.is_empty() {
            return Err(CourseHubError::validation("评分标准至少需要一个章节"));
        }

        for (si, section) in self.sections.iter_mut().enumerate() {
            if section.title.trim().is_empty() {
                return Err(CourseHubError::validation(format!(
                    "第 {} 个章节缺少标题",
                    si + 1
                )));
            }
            if section.points < 0.0 {
                return Err(CourseHubError::validation(format!(
                    "章节 '{}' 的分值不能为负",
                    section.title
                )));
            }
            if section.criteria.is_empty() {
                return Err(CourseHubError::validation(format!(
                    "章节 '{}' 至少需要一个评分点",
                    section.title
                )));
            }

            let mut criteria_total = 0.0;
            for (ci, criterion) in section.criteria.iter_mut().enumerate() {
                if criterion.description.trim().is_empty() {
                    return Err(CourseHubError::validation(format!(
                        "章节 '{}' 的第 {} 个评分点缺少描述",
                        section.title,
                        ci + 1
                    )));
                }
                if criterion.points < 0.0 {
                    return Err(CourseHubError::validation(format!(
                        "评分点 '{}' 的分值不能为负",
                        criterion.description
                    )));
                }
                if criterion.id.trim().is_empty() {
                    criterion.id = format!("s{}.c{}", si + 1, ci + 1);
                }
                criteria_total += criterion.points;
            }

            if (section.points - criteria_total).abs() > POINT_EPSILON {
                return Err(CourseHubError::validation(format!(
                    "章节 '{}' 声明分值 {} 与评分点分值之和 {} 不一致",
                    section.title, section.points, criteria_total
                )));
            }
        }

        // id 全局唯一
        let mut seen = std::collections::HashSet::new();
        for criterion in self.criteria() {
            if !seen.insert(criterion.id.as_str()) {
                return Err(CourseHubError::validation(format!(
                    "评分点 id '{}' 重复",
                    criterion.id
                )));
            }
        }

        Ok(self)
    }

    /// 从外部 JSON 导入并校验
    ///
    /// 解析失败返回 MalformedInput，结构失败返回 Validation。
    /// 未知字段一律拒绝，不做形状猜测。
    pub fn from_json(json: &str) -> Result<Self> {
        let rubric: Rubric = serde_json::from_str(json)
            .map_err(|e| CourseHubError::malformed_input(format!("评分标准解析失败: {e}")))?;
        rubric.validate()
    }

    /// 作业总分，始终由章节分值之和推导
    pub fn total_points(&self) -> f64 {
        self.sections.iter().map(|s| s.points).sum()
    }

    /// 校验客户端声明的总分与推导值一致（声明值仅作交叉检查，不入库）
    pub fn check_declared_total(&self, declared: Option<f64>) -> Result<()> {
        if let Some(total) = declared {
            let derived = self.total_points();
            if (total - derived).abs() > POINT_EPSILON {
                return Err(CourseHubError::validation(format!(
                    "作业声明总分 {total} 与评分标准推导总分 {derived} 不一致"
                )));
            }
        }
        Ok(())
    }

    /// 遍历所有评分点（按章节、章节内顺序）
    pub fn criteria(&self) -> impl Iterator<Item = &RubricCriterion> {
        self.sections.iter().flat_map(|s| s.criteria.iter())
    }

    /// 按评分点聚合总分
    ///
    /// 每个评分点都必须给分，且 0 <= 得分 <= 评分点分值；
    /// 引用了不存在的评分点同样是校验错误。
    /// 成功时返回的总分不会超过 `total_points()`。
    pub fn aggregate_scores(&self, scores_by_criterion: &HashMap<String, f64>) -> Result<f64> {
        let mut total = 0.0;
        let mut matched = 0usize;

        for criterion in self.criteria() {
            let score = match scores_by_criterion.get(&criterion.id) {
                Some(score) => *score,
                None => {
                    return Err(CourseHubError::validation(format!(
                        "评分点 '{}' ({}) 未给分",
                        criterion.id, criterion.description
                    )));
                }
            };
            if score < 0.0 || score > criterion.points {
                return Err(CourseHubError::validation(format!(
                    "评分点 '{}' 得分 {} 超出范围 [0, {}]",
                    criterion.id, score, criterion.points
                )));
            }
            total += score;
            matched += 1;
        }

        if matched != scores_by_criterion.len() {
            let known: std::collections::HashSet<&str> =
                self.criteria().map(|c| c.id.as_str()).collect();
            let unknown: Vec<&str> = scores_by_criterion
                .keys()
                .map(|k| k.as_str())
                .filter(|k| !known.contains(k))
                .collect();
            return Err(CourseHubError::validation(format!(
                "引用了不存在的评分点: {}",
                unknown.join(", ")
            )));
        }

        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criterion(id: &str, description: &str, points: f64) -> RubricCriterion {
        RubricCriterion {
            id: id.to_string(),
            description: description.to_string(),
            points,
        }
    }

    /// 满分 100 的标准样例：内容 60（清晰 30 + 正确 30），风格 40（语法 20 + 排版 20）
    fn sample_rubric() -> Rubric {
        Rubric {
            sections: vec![
                RubricSection {
                    title: "Content".to_string(),
                    points: 60.0,
                    criteria: vec![
                        criterion("clarity", "Clarity", 30.0),
                        criterion("correctness", "Correctness", 30.0),
                    ],
                },
                RubricSection {
                    title: "Style".to_string(),
                    points: 40.0,
                    criteria: vec![
                        criterion("grammar", "Grammar", 20.0),
                        criterion("formatting", "Formatting", 20.0),
                    ],
                },
            ],
        }
    }

    #[test]
    fn test_valid_rubric_roundtrip() {
        let rubric = sample_rubric().validate().expect("sample should validate");
        assert_eq!(rubric.total_points(), 100.0);

        // 序列化后重新导入，结构与总分保持一致
        let json = serde_json::to_string(&rubric).unwrap();
        let reloaded = Rubric::from_json(&json).expect("roundtrip should validate");
        assert_eq!(reloaded, rubric);
        assert_eq!(reloaded.total_points(), 100.0);
    }

    #[test]
    fn test_section_points_mismatch_rejected() {
        let mut rubric = sample_rubric();
        rubric.sections[0].points = 70.0;
        let err = rubric.validate().unwrap_err();
        assert_eq!(err.code(), "E007");
        assert!(err.message().contains("Content"));
    }

    #[test]
    fn test_empty_criteria_rejected() {
        let mut rubric = sample_rubric();
        rubric.sections[1].criteria.clear();
        assert!(rubric.validate().is_err());
    }

    #[test]
    fn test_negative_points_rejected() {
        let mut rubric = sample_rubric();
        rubric.sections[0].criteria[0].points = -1.0;
        assert!(rubric.validate().is_err());
    }

    #[test]
    fn test_empty_description_rejected() {
        let mut rubric = sample_rubric();
        rubric.sections[0].criteria[0].description = "  ".to_string();
        assert!(rubric.validate().is_err());
    }

    #[test]
    fn test_duplicate_criterion_id_rejected() {
        let mut rubric = sample_rubric();
        rubric.sections[1].criteria[0].id = "clarity".to_string();
        // 重复 id 会破坏评分请求的引用，必须拒绝
        rubric.sections[1].points = 40.0;
        assert!(rubric.validate().is_err());
    }

    #[test]
    fn test_missing_ids_assigned_positionally() {
        let mut rubric = sample_rubric();
        for section in &mut rubric.sections {
            for criterion in &mut section.criteria {
                criterion.id.clear();
            }
        }
        let rubric = rubric.validate().unwrap();
        let ids: Vec<&str> = rubric.criteria().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["s1.c1", "s1.c2", "s2.c1", "s2.c2"]);
    }

    #[test]
    fn test_declared_total_checked() {
        let rubric = sample_rubric().validate().unwrap();
        assert!(rubric.check_declared_total(None).is_ok());
        assert!(rubric.check_declared_total(Some(100.0)).is_ok());
        assert!(rubric.check_declared_total(Some(95.0)).is_err());
    }

    #[test]
    fn test_from_json_malformed() {
        let err = Rubric::from_json("{not json").unwrap_err();
        assert_eq!(err.code(), "E010"); // MalformedInput
    }

    #[test]
    fn test_from_json_unknown_field_rejected() {
        // 形状不匹配直接拒绝，不做 shape 猜测
        let json = r#"{"sections":[{"title":"A","points":1.0,"weight":2,
            "criteria":[{"id":"a","description":"a","points":1.0}]}]}"#;
        let err = Rubric::from_json(json).unwrap_err();
        assert_eq!(err.code(), "E010");
    }

    #[test]
    fn test_from_json_structural_failure() {
        // 可解析但结构不一致：章节分值与评分点之和不符
        let json = r#"{"sections":[{"title":"A","points":10.0,
            "criteria":[{"id":"a","description":"a","points":5.0}]}]}"#;
        let err = Rubric::from_json(json).unwrap_err();
        assert_eq!(err.code(), "E007"); // Validation
    }

    #[test]
    fn test_aggregate_scenario_scores_90() {
        let rubric = sample_rubric().validate().unwrap();
        let scores = HashMap::from([
            ("clarity".to_string(), 25.0),
            ("correctness".to_string(), 30.0),
            ("grammar".to_string(), 20.0),
            ("formatting".to_string(), 15.0),
        ]);
        let grade = rubric.aggregate_scores(&scores).unwrap();
        assert_eq!(grade, 90.0);
    }

    #[test]
    fn test_aggregate_never_exceeds_total() {
        let rubric = sample_rubric().validate().unwrap();
        // 每个评分点都给满分
        let scores: HashMap<String, f64> = rubric
            .criteria()
            .map(|c| (c.id.clone(), c.points))
            .collect();
        let grade = rubric.aggregate_scores(&scores).unwrap();
        assert!(grade <= rubric.total_points());
        assert_eq!(grade, 100.0);
    }

    #[test]
    fn test_aggregate_score_out_of_range() {
        let rubric = sample_rubric().validate().unwrap();
        let scores = HashMap::from([
            ("clarity".to_string(), 31.0), // 超过 30
            ("correctness".to_string(), 30.0),
            ("grammar".to_string(), 20.0),
            ("formatting".to_string(), 20.0),
        ]);
        assert!(rubric.aggregate_scores(&scores).is_err());

        let scores = HashMap::from([
            ("clarity".to_string(), -1.0),
            ("correctness".to_string(), 30.0),
            ("grammar".to_string(), 20.0),
            ("formatting".to_string(), 20.0),
        ]);
        assert!(rubric.aggregate_scores(&scores).is_err());
    }

    #[test]
    fn test_aggregate_missing_criterion() {
        let rubric = sample_rubric().validate().unwrap();
        let scores = HashMap::from([
            ("clarity".to_string(), 25.0),
            ("correctness".to_string(), 30.0),
        ]);
        let err = rubric.aggregate_scores(&scores).unwrap_err();
        assert!(err.message().contains("未给分"));
    }

    #[test]
    fn test_aggregate_unknown_criterion() {
        let rubric = sample_rubric().validate().unwrap();
        let mut scores: HashMap<String, f64> = rubric
            .criteria()
            .map(|c| (c.id.clone(), c.points))
            .collect();
        scores.insert("bonus".to_string(), 5.0);
        let err = rubric.aggregate_scores(&scores).unwrap_err();
        assert!(err.message().contains("bonus"));
    }
}
