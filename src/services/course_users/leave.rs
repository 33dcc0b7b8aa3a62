use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::CourseUserService;
use crate::middlewares::RequireJWT;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

/// 退课/移除成员
///
/// 学生只能移除自己（退课）；教师和管理员可以移除课程内任意学生。
pub async fn remove_member(
    service: &CourseUserService,
    request: &HttpRequest,
    course_id: i64,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let current_user = match RequireJWT::extract_user_claims(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
        }
    };

    // 学生只能移除自己
    if current_user.role == UserRole::User && current_user.id != user_id {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::CoursePermissionDenied,
            "You can only remove yourself from a course",
        )));
    }

    // 授课教师不能被移出自己的课程
    match storage.get_course_by_id(course_id).await {
        Ok(Some(course)) if course.instructor_id == user_id => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "Course instructor cannot be removed",
            )));
        }
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

    match storage.leave_course(user_id, course_id).await {
        Ok(true) => {
            info!(
                "User {} removed from course {} by {}",
                user_id, course_id, current_user.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Member removed")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseMemberNotFound,
            "该用户不是课程成员",
        ))),
        Err(e) => {
            error!("Error removing member: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("移除成员失败: {e}"),
                )),
            )
        }
    }
}
