use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::SubmissionService;
use crate::errors::CourseHubError;
use crate::middlewares::RequireJWT;
use crate::models::course_users::entities::CourseUserRole;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

/// 返还提交：graded -> returned，终态
///
/// 尚未评分的提交不能返还；已返还的提交重复返还得到 409。
pub async fn return_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let current_user = match RequireJWT::extract_user_claims(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
        }
    };

    // 加载提交与所属作业，校验课程教师权限
    let submission = match storage.get_submission_by_id(submission_id).await {
        Ok(Some(submission)) => submission,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubmissionNotFound,
                "提交不存在",
            )));
        }
        Err(e) => {
            error!("Error getting submission by id: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询提交失败: {e}"),
                )),
            );
        }
    };

    if current_user.role != UserRole::Admin {
        let assignment = match storage.get_assignment_by_id(submission.assignment_id).await {
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

        let is_instructor = match storage
            .get_course_user_by_user_id_and_course_id(current_user.id, assignment.course_id)
            .await
        {
            Ok(Some(cu)) => cu.role == CourseUserRole::Instructor,
            _ => false,
        };
        if !is_instructor {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::Forbidden,
                "只有课程教师可以返还提交",
            )));
        }
    }

    match storage.return_submission(submission_id).await {
        Ok(submission) => {
            info!(
                "Submission {} returned by user {}",
                submission_id, current_user.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "Submission returned")))
        }
        Err(CourseHubError::Validation(msg)) => Ok(HttpResponse::BadRequest().json(
            ApiResponse::error_empty(ErrorCode::SubmissionStatusInvalid, msg),
        )),
        Err(CourseHubError::Conflict(msg)) => Ok(HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::Conflict, msg))),
        Err(CourseHubError::NotFound(msg)) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::SubmissionNotFound, msg))),
        Err(e) => {
            error!("Error returning submission: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("返还提交失败: {e}"),
                )),
            )
        }
    }
}
