pub mod client;
pub mod completion;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::chat::requests::ChatCompletionRequest;

use client::{ChatClient, ChatHttpClient};

pub struct ChatService {
    client: Arc<dyn ChatClient>,
}

impl ChatService {
    pub fn new_lazy() -> Self {
        Self {
            client: Arc::new(ChatHttpClient::new()),
        }
    }

    /// 聊天补全（尽力而为，上游失败时返回兜底文案）
    pub async fn completion(
        &self,
        request: &HttpRequest,
        req: ChatCompletionRequest,
    ) -> ActixResult<HttpResponse> {
        completion::handle_completion(self.client.as_ref(), request, req).await
    }
}
