use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::{AssignmentService, check_course_staff};
use crate::middlewares::RequireJWT;
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::{ApiResponse, ErrorCode};

pub async fn create_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    mut req: CreateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let current_user = match RequireJWT::extract_user_claims(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
        }
    };

    // 课程必须存在
    match storage.get_course_by_id(req.course_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "课程不存在",
            )));
        }
        Err(e) => {
            error!("Error getting course by id: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询课程失败: {e}"),
                )),
            );
        }
    }

    // 权限校验
    if let Err(resp) = check_course_staff(&storage, &current_user, req.course_id).await {
        return Ok(resp);
    }

    if req.title.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "作业标题不能为空",
        )));
    }

    // 评分标准校验归一化；总分由评分标准推导，声明值只做交叉检查
    let rubric = match req.rubric.clone().validate() {
        Ok(rubric) => rubric,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::RubricInvalid,
                e.message().to_string(),
            )));
        }
    };
    if let Err(e) = rubric.check_declared_total(req.total_points) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::RubricInvalid,
            e.message().to_string(),
        )));
    }
    req.rubric = rubric;

    match storage.create_assignment(current_user.id, req).await {
        Ok(assignment) => {
            info!(
                "Assignment {} created in course {} by {}",
                assignment.id, assignment.course_id, current_user.id
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(assignment, "Assignment created successfully")))
        }
        Err(e) => {
            error!("Error creating assignment: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::AssignmentCreationFailed,
                    format!("创建作业失败: {e}"),
                )),
            )
        }
    }
}
