use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::{AssignmentService, check_course_staff};
use crate::errors::CourseHubError;
use crate::middlewares::RequireJWT;
use crate::models::assignments::requests::ImportRubricRequest;
use crate::models::assignments::rubric::Rubric;
use crate::models::{ApiResponse, ErrorCode};

/// 导入外部评分标准 JSON，全量替换当前评分标准
///
/// 解析失败与结构失败分别映射到不同错误码；
/// 校验不通过时不落库，原评分标准保持不变。
pub async fn import_rubric(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    req: ImportRubricRequest,
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

    // 发布后评分标准锁定
    if assignment.published {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::RubricLocked,
            "作业已发布，评分标准不可替换",
        )));
    }

    // 解析 + 校验，全有或全无
    let rubric = match Rubric::from_json(&req.rubric_json) {
        Ok(rubric) => rubric,
        Err(CourseHubError::MalformedInput(msg)) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::RubricMalformed, msg)));
        }
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::RubricInvalid,
                e.message().to_string(),
            )));
        }
    };

    match storage.replace_rubric(assignment_id, rubric).await {
        Ok(Some(assignment)) => {
            info!(
                "Rubric of assignment {} replaced by user {}",
                assignment_id, current_user.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(assignment, "Rubric imported")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "作业不存在",
        ))),
        Err(e) => {
            error!("Error replacing rubric: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::AssignmentUpdateFailed,
                    format!("替换评分标准失败: {e}"),
                )),
            )
        }
    }
}
