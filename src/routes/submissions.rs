use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireJWT};
use crate::models::grades::requests::GradeSubmissionRequest;
use crate::models::submissions::requests::{CreateSubmissionRequest, SubmissionListQuery};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::SubmissionService;
use crate::utils::{SafeAssignmentIdI64, SafeSubmissionIdI64, SafeUserIdI64};

// 懒加载的全局 SUBMISSION_SERVICE 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

// 列出提交
pub async fn list_submissions(
    req: HttpRequest,
    query: web::Query<SubmissionListQuery>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .list_submissions(&req, query.into_inner())
        .await
}

// 创建提交
pub async fn create_submission(
    req: HttpRequest,
    body: web::Json<CreateSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .create_submission(&req, body.into_inner())
        .await
}

// 获取提交详情
pub async fn get_submission(
    req: HttpRequest,
    submission_id: SafeSubmissionIdI64,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .get_submission(&req, submission_id.0)
        .await
}

// 撤回提交
pub async fn delete_submission(
    req: HttpRequest,
    submission_id: SafeSubmissionIdI64,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .delete_submission(&req, submission_id.0)
        .await
}

// 首次评分
pub async fn grade_submission(
    req: HttpRequest,
    submission_id: SafeSubmissionIdI64,
    body: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .grade_submission(&req, submission_id.0, body.into_inner())
        .await
}

// 重新评分
pub async fn regrade_submission(
    req: HttpRequest,
    submission_id: SafeSubmissionIdI64,
    body: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .regrade_submission(&req, submission_id.0, body.into_inner())
        .await
}

// 返还提交
pub async fn return_submission(
    req: HttpRequest,
    submission_id: SafeSubmissionIdI64,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .return_submission(&req, submission_id.0)
        .await
}

// 获取提交的评分
pub async fn get_submission_grade(
    req: HttpRequest,
    submission_id: SafeSubmissionIdI64,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .get_submission_grade(&req, submission_id.0)
        .await
}

// 获取我的最新提交
pub async fn get_my_latest_submission(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    SUBMISSION_SERVICE
        .get_latest_submission(&req, assignment_id.0, user_id)
        .await
}

// 获取我的提交历史
pub async fn list_my_submissions(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    SUBMISSION_SERVICE
        .list_user_submissions(&req, assignment_id.0, user_id)
        .await
}

/// 分页查询参数
#[derive(Debug, serde::Deserialize, ts_rs::TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionSummaryQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

// 获取提交概览（按学生聚合）
pub async fn get_submission_summary(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
    query: web::Query<SubmissionSummaryQuery>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .get_submission_summary(&req, assignment_id.0, query.page, query.size)
        .await
}

// 获取某学生某作业的所有版本（教师视角）
pub async fn list_user_submissions_for_teacher(
    req: HttpRequest,
    path: (SafeAssignmentIdI64, SafeUserIdI64),
) -> ActixResult<HttpResponse> {
    let (assignment_id, user_id) = path;
    SUBMISSION_SERVICE
        .list_user_submissions(&req, assignment_id.0, user_id.0)
        .await
}

// 配置路由
pub fn configure_submissions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/submissions")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_submissions))
            .route("", web::post().to(create_submission))
            .route("/{submission_id}", web::get().to(get_submission))
            .route("/{submission_id}", web::delete().to(delete_submission))
            .route("/{submission_id}/grade", web::post().to(grade_submission))
            .route("/{submission_id}/grade", web::get().to(get_submission_grade))
            .route(
                "/{submission_id}/regrade",
                web::post().to(regrade_submission),
            )
            .route(
                "/{submission_id}/return",
                web::post().to(return_submission),
            ),
    );

    // 作业相关的提交路由（教师视角的权限在服务层按课程角色校验）
    cfg.service(
        web::scope("/api/v1/assignments/{assignment_id}/submissions")
            .wrap(middlewares::RequireJWT)
            .route("/my/latest", web::get().to(get_my_latest_submission))
            .route("/my", web::get().to(list_my_submissions))
            .route("/summary", web::get().to(get_submission_summary))
            .route(
                "/user/{user_id}",
                web::get().to(list_user_submissions_for_teacher),
            ),
    );
}
