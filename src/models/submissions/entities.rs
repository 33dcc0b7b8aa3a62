use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 提交生命周期状态
///
/// 只能单向推进：submitted -> graded -> returned。
/// "不存在记录" 是隐式的初始状态；returned 是终态。
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub enum SubmissionStatus {
    Submitted, // 已提交，待评分
    Graded,    // 已评分
    Returned,  // 已返还学生，终态
}

impl SubmissionStatus {
    pub const SUBMITTED: &'static str = "submitted";
    pub const GRADED: &'static str = "graded";
    pub const RETURNED: &'static str = "returned";

    /// 状态是否允许推进到 `next`
    ///
    /// 重新评分（graded -> graded）是显式允许的转换，区别于首次评分。
    pub fn can_transition_to(&self, next: SubmissionStatus) -> bool {
        matches!(
            (self, next),
            (SubmissionStatus::Submitted, SubmissionStatus::Graded)
                | (SubmissionStatus::Graded, SubmissionStatus::Graded)
                | (SubmissionStatus::Graded, SubmissionStatus::Returned)
        )
    }

    pub fn is_terminal(&self) -> bool {
        *self == SubmissionStatus::Returned
    }
}

impl<'de> Deserialize<'de> for SubmissionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Submitted => write!(f, "{}", Self::SUBMITTED),
            SubmissionStatus::Graded => write!(f, "{}", Self::GRADED),
            SubmissionStatus::Returned => write!(f, "{}", Self::RETURNED),
        }
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(SubmissionStatus::Submitted),
            "graded" => Ok(SubmissionStatus::Graded),
            "returned" => Ok(SubmissionStatus::Returned),
            _ => Err(format!(
                "无效的提交状态: '{s}'. 支持的状态: submitted, graded, returned"
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Submission {
    // 唯一 ID
    pub id: i64,
    // 关联的作业 ID
    pub assignment_id: i64,
    // 提交学生 ID
    pub student_id: i64,
    // 版本号，从 1 开始；(assignment_id, student_id, version) 唯一
    pub version: i32,
    // 在线文本内容
    pub content: Option<String>,
    // 附件 download_token 列表
    pub attachments: Vec<String>,
    // 生命周期状态
    pub status: SubmissionStatus,
    // 是否迟交
    pub is_late: bool,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(SubmissionStatus::Submitted.can_transition_to(SubmissionStatus::Graded));
        assert!(SubmissionStatus::Graded.can_transition_to(SubmissionStatus::Returned));
    }

    #[test]
    fn test_regrade_is_explicit_transition() {
        assert!(SubmissionStatus::Graded.can_transition_to(SubmissionStatus::Graded));
        // 首次评分之前不存在重新评分
        assert!(!SubmissionStatus::Submitted.can_transition_to(SubmissionStatus::Submitted));
    }

    #[test]
    fn test_no_regression() {
        assert!(!SubmissionStatus::Graded.can_transition_to(SubmissionStatus::Submitted));
        assert!(!SubmissionStatus::Returned.can_transition_to(SubmissionStatus::Graded));
        assert!(!SubmissionStatus::Returned.can_transition_to(SubmissionStatus::Submitted));
    }

    #[test]
    fn test_return_requires_graded() {
        // submitted 不能直接 returned
        assert!(!SubmissionStatus::Submitted.can_transition_to(SubmissionStatus::Returned));
    }

    #[test]
    fn test_returned_is_terminal() {
        assert!(SubmissionStatus::Returned.is_terminal());
        assert!(!SubmissionStatus::Returned.can_transition_to(SubmissionStatus::Returned));
    }

    #[test]
    fn test_status_string_roundtrip() {
        for status in [
            SubmissionStatus::Submitted,
            SubmissionStatus::Graded,
            SubmissionStatus::Returned,
        ] {
            let parsed: SubmissionStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("pending".parse::<SubmissionStatus>().is_err());
    }
}
