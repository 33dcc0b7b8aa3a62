//! 路径参数安全提取器
//!
//! 在进入处理函数之前完成路径 ID 的解析和基本校验，
//! 非法参数直接返回统一格式的 400 响应。

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn bad_request(message: &str) -> actix_web::Error {
    InternalError::from_response(
        message.to_string(),
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
    )
    .into()
}

/// 定义路径 ID 提取器的宏：提取指定名称的路径参数并解析为正整数
macro_rules! define_safe_id_extractor {
    ($(
        $name:ident($param:literal)
    ),* $(,)?) => {
        $(
            pub struct $name(pub i64);

            impl FromRequest for $name {
                type Error = actix_web::Error;
                type Future = Ready<Result<Self, Self::Error>>;

                fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                    let result = req
                        .match_info()
                        .get($param)
                        .and_then(|raw| raw.parse::<i64>().ok())
                        .filter(|id| *id > 0)
                        .map($name)
                        .ok_or_else(|| {
                            bad_request(concat!("Invalid path parameter: ", $param))
                        });
                    ready(result)
                }
            }
        )*
    };
}

define_safe_id_extractor! {
    SafeCourseIdI64("course_id"),
    SafeAssignmentIdI64("assignment_id"),
    SafeSubmissionIdI64("submission_id"),
    SafeUserIdI64("user_id"),
}

/// 文件 download_token 提取器：只允许 UUID 形态的字符
pub struct SafeFileToken(pub String);

impl FromRequest for SafeFileToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = req
            .match_info()
            .get("token")
            .filter(|raw| {
                !raw.is_empty()
                    && raw.len() <= 64
                    && raw
                        .bytes()
                        .all(|b| b.is_ascii_alphanumeric() || b == b'-')
            })
            .map(|raw| SafeFileToken(raw.to_string()))
            .ok_or_else(|| bad_request("Invalid file token"));
        ready(result)
    }
}
