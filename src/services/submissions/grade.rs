use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::{error, info};

use super::SubmissionService;
use crate::errors::CourseHubError;
use crate::middlewares::RequireJWT;
use crate::models::course_users::entities::CourseUserRole;
use crate::models::grades::requests::GradeSubmissionRequest;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::validate::validate_plagiarism_score;

/// 检查用户是否有权限评分：课程教师或管理员
async fn check_grade_permission(
    storage: &Arc<dyn Storage>,
    current_user: &User,
    course_id: i64,
) -> Result<(), HttpResponse> {
    if current_user.role == UserRole::Admin {
        return Ok(());
    }

    let course_user = match storage
        .get_course_user_by_user_id_and_course_id(current_user.id, course_id)
        .await
    {
        Ok(Some(cu)) => cu,
        Ok(None) => {
            return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::CoursePermissionDenied,
                "您不是该课程成员",
            )));
        }
        Err(e) => {
            return Err(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询课程成员失败: {e}"),
                )),
            );
        }
    };

    // 助教只读，评分权限仅限教师
    if course_user.role == CourseUserRole::Instructor {
        Ok(())
    } else {
        Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "只有课程教师可以评分",
        )))
    }
}

/// 评分 / 重新评分
///
/// 得分按评分点逐项校验并求和；首次评分完成 submitted -> graded 转换，
/// 重新评分仅替换明细。并发评分的输家收到 409。
pub async fn grade_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
    req: GradeSubmissionRequest,
    regrade: bool,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let current_user = match RequireJWT::extract_user_claims(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
        }
    };

    // 加载提交与所属作业
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
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询作业失败: {e}"),
                )),
            );
        }
    };

    // 权限校验
    if let Err(resp) = check_grade_permission(&storage, &current_user, assignment.course_id).await {
        return Ok(resp);
    }

    // 查重相似度范围校验
    if let Some(score) = req.plagiarism_score
        && let Err(msg) = validate_plagiarism_score(score)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::GradeInvalid, msg)));
    }

    // 按评分标准聚合总分：逐项校验范围，引用未知评分点或漏项都拒绝
    let score = match assignment.rubric.aggregate_scores(&req.scores_by_criterion) {
        Ok(score) => score,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::GradeInvalid,
                e.message().to_string(),
            )));
        }
    };

    let result = if regrade {
        storage
            .regrade_submission(current_user.id, submission_id, score, req)
            .await
    } else {
        storage
            .grade_submission(current_user.id, submission_id, score, req)
            .await
    };

    match result {
        Ok(grade) => {
            info!(
                "Submission {} {} by grader {} with score {}",
                submission_id,
                if regrade { "regraded" } else { "graded" },
                current_user.id,
                grade.score
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(grade, "Graded successfully")))
        }
        Err(CourseHubError::Conflict(msg)) => Ok(HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::GradeConflict, msg))),
        Err(CourseHubError::NotFound(msg)) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::SubmissionNotFound, msg))),
        Err(e) => {
            error!("Error grading submission: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("评分失败: {e}"),
                )),
            )
        }
    }
}

/// 获取提交的评分
/// GET /submissions/{id}/grade
pub async fn get_submission_grade(
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

    // 本人、课程教学人员或管理员可见
    if let Err(resp) =
        super::detail::check_submission_access(&storage, &current_user, &submission).await
    {
        return Ok(resp);
    }

    match storage.get_grade_by_submission_id(submission_id).await {
        Ok(Some(grade)) => Ok(HttpResponse::Ok().json(ApiResponse::success(grade, "查询成功"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::GradeNotFound,
            "该提交尚未评分",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询评分失败: {e}"),
            )),
        ),
    }
}
