use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 文件元数据
///
/// 磁盘 blob 写入成功之后才会产生元数据记录；
/// download_token 是对外的唯一引用，磁盘路径不暴露。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/file.ts")]
pub struct File {
    pub id: i64,
    pub download_token: String,
    pub original_name: String,
    #[serde(skip_serializing)]
    #[ts(skip)]
    pub stored_name: String,
    pub file_size: i64,
    pub file_type: String,
    // 被提交/作业引用的次数
    pub citation_count: i32,
    pub user_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
