use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::CourseService;
use crate::middlewares::RequireJWT;
use crate::models::courses::requests::CourseQueryParams;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

/// 列出课程：管理员看全部，教师看自己开的课，学生看已加入的课
pub async fn list_courses(
    service: &CourseService,
    request: &HttpRequest,
    params: CourseQueryParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let current_user = match RequireJWT::extract_user_claims(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
        }
    };

    let mut query: crate::models::courses::requests::CourseListQuery = params.into();

    let result = match current_user.role {
        UserRole::Admin => storage.list_courses_with_pagination(query).await,
        UserRole::Instructor => {
            query.instructor_id = Some(current_user.id);
            storage.list_courses_with_pagination(query).await
        }
        UserRole::User => {
            storage
                .list_user_courses_with_pagination(current_user.id, query)
                .await
        }
    };

    match result {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功"))),
        Err(e) => {
            error!("Error listing courses: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询课程列表失败: {e}"),
                )),
            )
        }
    }
}
