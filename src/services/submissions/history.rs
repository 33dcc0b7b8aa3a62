use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::SubmissionService;
use crate::middlewares::RequireJWT;
use crate::services::assignments::check_course_staff;
use crate::models::{ApiResponse, ErrorCode};

/// 获取学生某作业的所有提交版本（按版本倒序）
///
/// 查询他人历史需要课程教学人员身份。
pub async fn list_user_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let current_user = match RequireJWT::extract_user_claims(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
        }
    };

    if student_id != current_user.id {
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
                return Ok(HttpResponse::InternalServerError().json(
                    ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("查询作业失败: {e}"),
                    ),
                ));
            }
        };
        if let Err(resp) = check_course_staff(&storage, &current_user, assignment.course_id).await
        {
            return Ok(resp);
        }
    }

    match storage
        .list_user_submissions(assignment_id, student_id)
        .await
    {
        Ok(submissions) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(submissions, "查询成功")))
        }
        Err(e) => {
            error!("Error listing user submissions: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询提交历史失败: {e}"),
                )),
            )
        }
    }
}
