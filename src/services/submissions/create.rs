use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::SubmissionService;
use crate::middlewares::RequireJWT;
use crate::models::submissions::requests::CreateSubmissionRequest;
use crate::models::{ApiResponse, ErrorCode};

/// 学生提交作业
///
/// 规则：
/// - 作业必须已发布，提交者必须是课程成员；
/// - 截止之后仅当作业允许迟交时接受，并记 is_late 标志；
/// - 未开启重复提交时，已有提交再次提交得到 409，原提交不受影响；
/// - 同一学生的并发提交由存储层唯一约束串行化，输家同样得到 409。
pub async fn create_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    req: CreateSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let current_user = match RequireJWT::extract_user_claims(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
        }
    };

    // 作业必须存在且已发布
    let assignment = match storage.get_assignment_by_id(req.assignment_id).await {
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

    if !assignment.published {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotPublished,
            "作业尚未发布，不接受提交",
        )));
    }

    // 提交者必须是课程成员
    match storage
        .get_course_user_by_user_id_and_course_id(current_user.id, assignment.course_id)
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::CoursePermissionDenied,
                "您不是该课程成员",
            )));
        }
        Err(e) => {
            error!("Error getting course membership: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询课程成员失败: {e}"),
                )),
            );
        }
    }

    // 迟交按标志记录，不允许迟交时直接拒绝
    let now = chrono::Utc::now();
    let is_late = match assignment.due_date {
        Some(due_date) => now > due_date,
        None => false,
    };
    if is_late && !assignment.allow_late {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AssignmentDeadlinePassed,
            "作业已截止且不允许迟交",
        )));
    }

    // 提交内容必须符合作业声明的提交类型
    let has_content = req
        .content
        .as_ref()
        .is_some_and(|c| !c.trim().is_empty());
    let has_files = !req.attachments.is_empty();

    if has_content && !assignment.submission_type.allows_text() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::SubmissionTypeNotAllowed,
            "该作业不接受文本提交",
        )));
    }
    if has_files && !assignment.submission_type.allows_files() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::SubmissionTypeNotAllowed,
            "该作业不接受附件提交",
        )));
    }
    if !has_content && !has_files {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "提交内容不能为空",
        )));
    }

    // 附件逐个校验作业级约束：扩展名白名单与大小上限
    for token in &req.attachments {
        let file = match storage.get_file_by_token(token).await {
            Ok(Some(file)) => file,
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::FileNotFound,
                    format!("文件不存在: {token}"),
                )));
            }
            Err(e) => {
                error!("Error getting file by token: {}", e);
                return Ok(HttpResponse::InternalServerError().json(
                    ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("查询文件失败: {e}"),
                    ),
                ));
            }
        };

        if !assignment.allowed_extensions.is_empty() {
            let extension = std::path::Path::new(&file.original_name)
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| format!(".{}", ext.to_lowercase()))
                .unwrap_or_default();
            if !assignment
                .allowed_extensions
                .iter()
                .any(|t| t.to_lowercase() == extension)
            {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::FileTypeNotAllowed,
                    format!("该作业不接受 {extension} 类型的附件"),
                )));
            }
        }

        if let Some(max_file_size) = assignment.max_file_size
            && file.file_size > max_file_size
        {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::FileSizeExceeded,
                "附件超过该作业的大小上限",
            )));
        }
    }

    // 未开启重复提交时，已有提交直接拒绝；原提交保持不变
    if !assignment.allow_resubmission {
        match storage
            .get_latest_submission(req.assignment_id, current_user.id)
            .await
        {
            Ok(Some(_)) => {
                return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::AlreadySubmitted,
                    "已提交过该作业",
                )));
            }
            Ok(None) => {}
            Err(e) => {
                error!("Error getting latest submission: {}", e);
                return Ok(HttpResponse::InternalServerError().json(
                    ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("查询提交失败: {e}"),
                    ),
                ));
            }
        }
    }

    match storage
        .create_submission(current_user.id, req, is_late)
        .await
    {
        Ok(submission) => {
            info!(
                "Submission {} (v{}) created for assignment {} by student {}",
                submission.id, submission.version, submission.assignment_id, current_user.id
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(submission, "Submitted successfully")))
        }
        Err(e) if matches!(e, crate::errors::CourseHubError::Conflict(_)) => {
            // 并发提交的输家
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::AlreadySubmitted,
                "已提交过该作业",
            )))
        }
        Err(e) => {
            error!("Error creating submission: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::SubmissionCreationFailed,
                    format!("创建提交失败: {e}"),
                )),
            )
        }
    }
}
