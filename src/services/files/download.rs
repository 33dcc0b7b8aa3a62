use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::path::Path;
use tracing::error;

use super::FileService;
use crate::config::AppConfig;
use crate::models::{ApiResponse, ErrorCode};

/// 通过 download_token 下载文件
pub async fn handle_download(
    service: &FileService,
    request: &HttpRequest,
    token: String,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = AppConfig::get();

    let file = match storage.get_file_by_token(&token).await {
        Ok(Some(file)) => file,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FileNotFound,
                "文件不存在",
            )));
        }
        Err(e) => {
            error!("Error getting file by token: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询文件失败: {e}"),
                )),
            );
        }
    };

    let file_path = Path::new(&config.upload.dir).join(&file.stored_name);
    let read_path = file_path.clone();
    let read_result = actix_web::web::block(move || std::fs::read(&read_path)).await?;
    let bytes = match read_result {
        Ok(bytes) => bytes,
        Err(e) => {
            // 元数据存在但 blob 缺失，按 404 处理并记录
            error!(
                "Blob missing for file token {} at {:?}: {}",
                token, file_path, e
            );
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FileNotFound,
                "文件不存在",
            )));
        }
    };

    let content_type = if file.file_type.is_empty() {
        "application/octet-stream".to_string()
    } else {
        file.file_type.clone()
    };

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, content_type))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.original_name),
        ))
        .body(bytes))
}
