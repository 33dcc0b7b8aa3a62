use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::{AssignmentService, check_course_staff};
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};

/// 发布作业
///
/// 发布后作业开始接受提交，评分标准随之锁定；重复发布是幂等的。
pub async fn publish_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let current_user = match RequireJWT::extract_user_claims(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
        }
    };

    let assignment = match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "作业不存在",
            )));
        }
        Err(e) => {
            error!("Error getting assignment by id: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询作业失败: {e}"),
                )),
            );
        }
    };

    // 权限校验
    if let Err(resp) = check_course_staff(&storage, &current_user, assignment.course_id).await {
        return Ok(resp);
    }

    match storage.publish_assignment(assignment_id).await {
        Ok(Some(assignment)) => {
            info!(
                "Assignment {} published by user {}",
                assignment_id, current_user.id
            );
            Ok(HttpResponse::Ok()
                .json(ApiResponse::success(assignment, "Assignment published")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "作业不存在",
        ))),
        Err(e) => {
            error!("Error publishing assignment: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::AssignmentUpdateFailed,
                    format!("发布作业失败: {e}"),
                )),
            )
        }
    }
}
