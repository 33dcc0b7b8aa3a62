pub mod create;
pub mod delete;
pub mod detail;
pub mod import_rubric;
pub mod list;
pub mod publish;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::assignments::requests::{
    AssignmentListParams, CreateAssignmentRequest, ImportRubricRequest, UpdateAssignmentRequest,
};
use crate::models::course_users::entities::CourseUserRole;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct AssignmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssignmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    /// 创建作业
    pub async fn create_assignment(
        &self,
        request: &HttpRequest,
        req: CreateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_assignment(self, request, req).await
    }

    /// 获取作业详情
    pub async fn get_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_assignment(self, request, assignment_id).await
    }

    /// 列出作业
    pub async fn list_assignments(
        &self,
        request: &HttpRequest,
        params: AssignmentListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_assignments(self, request, params).await
    }

    /// 更新作业
    pub async fn update_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_assignment(self, request, assignment_id, update).await
    }

    /// 删除作业
    pub async fn delete_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_assignment(self, request, assignment_id).await
    }

    /// 发布作业
    pub async fn publish_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        publish::publish_assignment(self, request, assignment_id).await
    }

    /// 导入评分标准（全量替换）
    pub async fn import_rubric(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        req: ImportRubricRequest,
    ) -> ActixResult<HttpResponse> {
        import_rubric::import_rubric(self, request, assignment_id, req).await
    }
}

/// 校验用户是否为课程教学人员（教师/助教），管理员直接放行
pub(crate) async fn check_course_staff(
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

    if CourseUserRole::course_staff_roles().contains(&&course_user.role) {
        Ok(())
    } else {
        Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::CoursePermissionDenied,
            "只有课程教学人员可以执行此操作",
        )))
    }
}
