use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use super::client::ChatClient;
use crate::middlewares::RequireJWT;
use crate::models::chat::requests::ChatCompletionRequest;
use crate::models::chat::responses::ChatCompletionResponse;
use crate::models::{ApiResponse, ErrorCode};

/// 上游失败时返回给用户的固定兜底文案
const FALLBACK_MESSAGE: &str = "AI 助手暂时不可用，请稍后再试。";

/// 聊天补全透传
///
/// 上游失败不会让请求失败：返回 200 + 兜底文案 + degraded 标记，
/// 系统其余部分不受影响。
pub async fn handle_completion(
    client: &dyn ChatClient,
    request: &HttpRequest,
    req: ChatCompletionRequest,
) -> ActixResult<HttpResponse> {
    if RequireJWT::extract_user_id(request).is_none() {
        return Ok(HttpResponse::Unauthorized()
            .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
    }

    if req.messages.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "对话内容不能为空",
        )));
    }

    match client.complete(&req.messages).await {
        Ok(content) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ChatCompletionResponse {
                content,
                degraded: false,
            },
            "查询成功",
        ))),
        Err(e) => {
            // 降级而不失败
            warn!("Chat upstream degraded: {}", e);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                ChatCompletionResponse {
                    content: FALLBACK_MESSAGE.to_string(),
                    degraded: true,
                },
                "查询成功",
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CourseHubError;
    use crate::models::chat::requests::{ChatMessage, ChatRole};
    use async_trait::async_trait;

    struct FailingClient;

    #[async_trait]
    impl ChatClient for FailingClient {
        async fn complete(&self, _messages: &[ChatMessage]) -> crate::errors::Result<String> {
            Err(CourseHubError::upstream("connection refused"))
        }
    }

    struct EchoClient;

    #[async_trait]
    impl ChatClient for EchoClient {
        async fn complete(&self, messages: &[ChatMessage]) -> crate::errors::Result<String> {
            Ok(messages.last().map(|m| m.content.clone()).unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn test_upstream_failure_degrades_to_fallback() {
        let client = FailingClient;
        let messages = vec![ChatMessage {
            role: ChatRole::User,
            content: "hello".to_string(),
        }];
        // 上游失败时 complete 返回 Err，由 handler 降级；这里验证错误类型
        let err = client.complete(&messages).await.unwrap_err();
        assert_eq!(err.code(), "E015"); // Upstream
    }

    #[tokio::test]
    async fn test_echo_client_roundtrip() {
        let client = EchoClient;
        let messages = vec![
            ChatMessage {
                role: ChatRole::System,
                content: "you are helpful".to_string(),
            },
            ChatMessage {
                role: ChatRole::User,
                content: "ping".to_string(),
            },
        ];
        assert_eq!(client.complete(&messages).await.unwrap(), "ping");
    }
}
