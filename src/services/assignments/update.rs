use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::{AssignmentService, check_course_staff};
use crate::middlewares::RequireJWT;
use crate::models::assignments::requests::UpdateAssignmentRequest;
use crate::models::{ApiResponse, ErrorCode};

/// 更新作业
///
/// 已发布作业的评分标准与总分被锁定：带 rubric 或 total_points 的更新
/// 一律拒绝，避免已有提交的评分依据被偷换。
pub async fn update_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    mut update: UpdateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let current_user = match RequireJWT::extract_user_claims(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
        }
    };

    let existing = match storage.get_assignment_by_id(assignment_id).await {
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
    if let Err(resp) = check_course_staff(&storage, &current_user, existing.course_id).await {
        return Ok(resp);
    }

    // 发布后评分标准锁定
    if existing.published && (update.rubric.is_some() || update.total_points.is_some()) {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::RubricLocked,
            "作业已发布，评分标准与总分不可修改",
        )));
    }

    // 评分标准校验归一化
    if let Some(rubric) = update.rubric.take() {
        let rubric = match rubric.validate() {
            Ok(rubric) => rubric,
            Err(e) => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::RubricInvalid,
                    e.message().to_string(),
                )));
            }
        };
        if let Err(e) = rubric.check_declared_total(update.total_points) {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::RubricInvalid,
                e.message().to_string(),
            )));
        }
        update.rubric = Some(rubric);
    } else if update.total_points.is_some() {
        // 总分只能由评分标准推导，不接受单独修改
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::RubricInvalid,
            "总分由评分标准推导，请随评分标准一起提交",
        )));
    }

    match storage.update_assignment(assignment_id, update).await {
        Ok(Some(assignment)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(assignment, "Assignment updated successfully"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "作业不存在",
        ))),
        Err(e) => {
            error!("Error updating assignment: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::AssignmentUpdateFailed,
                    format!("更新作业失败: {e}"),
                )),
            )
        }
    }
}
