use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::CourseUserService;
use crate::models::course_users::requests::CourseUserQuery;
use crate::models::{ApiResponse, ErrorCode};

/// 列出课程成员（路由层已通过 RequireCourseRole 验证访问权限）
pub async fn list_members(
    service: &CourseUserService,
    request: &HttpRequest,
    course_id: i64,
    query: CourseUserQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage
        .list_course_users_with_pagination(course_id, query)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功"))),
        Err(e) => {
            error!("Error listing course members: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询课程成员失败: {e}"),
                )),
            )
        }
    }
}
