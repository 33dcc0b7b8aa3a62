//! 聊天补全上游客户端
//!
//! 对外部 chat-completion 接口的唯一契约是"尽力而为"：
//! 固定 1000 token 的响应预算，带显式超时；失败由调用方降级处理。

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::AppConfig;
use crate::errors::{CourseHubError, Result};
use crate::models::chat::requests::ChatMessage;

/// 单次补全的响应 token 预算
const MAX_COMPLETION_TOKENS: u32 = 1000;

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// 发送一组有序对话轮次，返回一条补全文本
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

#[derive(Serialize)]
struct CompletionRequestBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponseBody {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: String,
}

pub struct ChatHttpClient {
    client: Client,
}

impl ChatHttpClient {
    pub fn new() -> Self {
        let config = AppConfig::get();
        let client = Client::builder()
            .timeout(Duration::from_secs(config.ai.timeout))
            .build()
            .expect("Failed to build chat http client");
        Self { client }
    }
}

impl Default for ChatHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatClient for ChatHttpClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let config = AppConfig::get();

        let body = CompletionRequestBody {
            model: &config.ai.model,
            messages,
            max_tokens: MAX_COMPLETION_TOKENS,
        };

        let response = self
            .client
            .post(&config.ai.endpoint)
            .bearer_auth(&config.ai.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CourseHubError::upstream(format!("聊天上游请求失败: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(CourseHubError::upstream(format!(
                "聊天上游返回 {status}: {text}"
            )));
        }

        let parsed: CompletionResponseBody = response
            .json()
            .await
            .map_err(|e| CourseHubError::upstream(format!("聊天上游响应解析失败: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| CourseHubError::upstream("聊天上游响应为空"))
    }
}
