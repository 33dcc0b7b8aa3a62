use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::chat::requests::ChatCompletionRequest;
use crate::services::ChatService;

// 懒加载的全局 CHAT_SERVICE 实例
static CHAT_SERVICE: Lazy<ChatService> = Lazy::new(ChatService::new_lazy);

// 聊天补全
pub async fn chat_completion(
    req: HttpRequest,
    body: web::Json<ChatCompletionRequest>,
) -> ActixResult<HttpResponse> {
    CHAT_SERVICE.completion(&req, body.into_inner()).await
}

// 配置路由
pub fn configure_chat_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/chat")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/completions")
                    .wrap(middlewares::RateLimit::chat())
                    .route(web::post().to(chat_completion)),
            ),
    );
}
