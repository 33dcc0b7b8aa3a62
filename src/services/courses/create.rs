use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::CourseService;
use crate::middlewares::RequireJWT;
use crate::models::course_users::entities::CourseUserRole;
use crate::models::courses::requests::CreateCourseRequest;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

pub async fn create_course(
    service: &CourseService,
    request: &HttpRequest,
    course_data: CreateCourseRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let current_user = match RequireJWT::extract_user_claims(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Unauthorized: missing user claims",
            )));
        }
    };

    // 结课日期必须晚于开课日期
    if course_data.end_date <= course_data.start_date {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "End date must be after start date",
        )));
    }

    // 权限校验：教师只能为自己开课，管理员可以为任意教师开课
    let instructor_id = match (&current_user.role, course_data.instructor_id) {
        (UserRole::Admin, Some(instructor_id)) => {
            match storage.get_user_by_id(instructor_id).await {
                Ok(Some(user)) if user.role == UserRole::Instructor => instructor_id,
                Ok(Some(_)) => {
                    return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                        ErrorCode::CoursePermissionDenied,
                        "Admin can only create courses for instructors",
                    )));
                }
                Ok(None) => {
                    return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                        ErrorCode::UserNotFound,
                        "Instructor not found",
                    )));
                }
                Err(e) => {
                    error!("Failed to get user by id: {}", e);
                    return Ok(HttpResponse::InternalServerError().json(
                        ApiResponse::error_empty(
                            ErrorCode::InternalServerError,
                            "Internal server error while fetching user",
                        ),
                    ));
                }
            }
        }
        (UserRole::Admin, None) | (UserRole::Instructor, _)
            if course_data.instructor_id.is_none()
                || course_data.instructor_id == Some(current_user.id) =>
        {
            current_user.id
        }
        (UserRole::Instructor, _) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::CoursePermissionDenied,
                "You do not have permission to create a course for another instructor",
            )));
        }
        _ => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::CoursePermissionDenied,
                "You do not have permission to create a course",
            )));
        }
    };

    // 创建课程，并把授课教师写入成员表
    match storage.create_course(instructor_id, course_data).await {
        Ok(course) => {
            if let Err(e) = storage
                .enroll_course(instructor_id, course.id, CourseUserRole::Instructor)
                .await
            {
                error!("Failed to enroll instructor into course {}: {}", course.id, e);
            }
            info!(
                "Course {} created successfully by {}",
                course.course_name, instructor_id
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(course, "Course created successfully")))
        }
        Err(e) => {
            let msg = format!("Course creation failed: {e}");
            error!("{}", msg);
            if e.is_unique_violation() {
                Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::CourseAlreadyExists,
                    "Entry code collision persisted, please retry",
                )))
            } else {
                Ok(HttpResponse::InternalServerError()
                    .json(ApiResponse::error_empty(ErrorCode::CourseCreationFailed, msg)))
            }
        }
    }
}
