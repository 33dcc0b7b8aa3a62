use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::CourseUserService;
use crate::{
    middlewares::RequireJWT,
    models::{
        ApiResponse, ErrorCode,
        course_users::{entities::CourseUserRole, requests::EnrollRequest},
    },
};

/// 学生通过入班码加入课程
///
/// 码无效与课程不存在返回同样的 404，不泄露课程存在性；
/// 已加入返回 409；入班码匹配大小写不敏感。
pub async fn enroll_course(
    service: &CourseUserService,
    request: &HttpRequest,
    course_id: i64,
    enroll_data: EnrollRequest,
) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(request) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Unauthorized: missing user id",
            )));
        }
    };

    let storage = service.get_storage(request);
    let entry_code = &enroll_data.entry_code;

    let (course, course_user) = match storage
        .get_course_and_course_user_by_course_id_and_code(course_id, entry_code, user_id)
        .await
    {
        Ok(res) => res,
        Err(e) => {
            error!("Error getting course and membership by id and code: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::EnrollFailed,
                    "Failed to get course and membership",
                )),
            );
        }
    };

    if course.is_none() {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EntryCodeInvalid,
            "Course not found or entry code is invalid",
        )));
    }
    if course_user.is_some() {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error(
            ErrorCode::AlreadyEnrolled,
            course.unwrap(),
            "User has already enrolled in the course",
        )));
    }

    // 并发入班由唯一索引兜底，输家拿到 Conflict
    match storage
        .enroll_course(user_id, course_id, CourseUserRole::Student)
        .await
    {
        Ok(course_user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            course_user,
            "Enrolled successfully",
        ))),
        Err(e) if matches!(e, crate::errors::CourseHubError::Conflict(_)) => {
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::AlreadyEnrolled,
                "User has already enrolled in the course",
            )))
        }
        Err(e) => {
            error!("Error enrolling course: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::EnrollFailed,
                    "Failed to enroll in course",
                )),
            )
        }
    }
}
