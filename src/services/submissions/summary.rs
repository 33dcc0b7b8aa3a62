use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::SubmissionService;
use crate::middlewares::RequireJWT;
use crate::services::assignments::check_course_staff;
use crate::models::{ApiResponse, ErrorCode};

/// 获取作业提交概览（按学生聚合，教师视角）
pub async fn get_submission_summary(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    page: Option<i64>,
    size: Option<i64>,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let current_user = match RequireJWT::extract_user_claims(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
        }
    };

    // 作业必须存在
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

    // 概览包含全体学生的提交情况，仅课程教学人员可见
    if let Err(resp) = check_course_staff(&storage, &current_user, assignment.course_id).await {
        return Ok(resp);
    }

    match storage
        .get_submission_summary(assignment_id, page.unwrap_or(1), size.unwrap_or(10))
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功"))),
        Err(e) => {
            error!("Error getting submission summary: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询提交概览失败: {e}"),
                )),
            )
        }
    }
}
