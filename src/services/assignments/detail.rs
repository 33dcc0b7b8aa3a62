use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::AssignmentService;
use crate::middlewares::RequireJWT;
use crate::models::assignments::responses::AssignmentDetailResponse;
use crate::models::course_users::entities::CourseUserRole;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

/// 获取作业详情
///
/// 未发布的作业只有课程教学人员和管理员可见。
pub async fn get_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
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

    // 草稿作业对学生隐藏
    if !assignment.published && current_user.role == UserRole::User {
        let is_staff = match storage
            .get_course_user_by_user_id_and_course_id(current_user.id, assignment.course_id)
            .await
        {
            Ok(Some(cu)) => CourseUserRole::course_staff_roles().contains(&&cu.role),
            _ => false,
        };
        if !is_staff {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "作业不存在",
            )));
        }
    }

    // 提交数在读取时统计
    let submission_count = match storage
        .count_submissions_for_assignment(assignment.id)
        .await
    {
        Ok(count) => count,
        Err(e) => {
            error!("Error counting submissions: {}", e);
            0
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AssignmentDetailResponse {
            assignment,
            submission_count,
        },
        "查询成功",
    )))
}
