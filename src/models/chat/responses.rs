use serde::Serialize;
use ts_rs::TS;

/// 聊天补全响应
///
/// 上游失败时 degraded 为 true，content 为固定的兜底文案。
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/chat.ts")]
pub struct ChatCompletionResponse {
    pub content: String,
    pub degraded: bool,
}
