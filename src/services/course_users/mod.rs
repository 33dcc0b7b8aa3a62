pub mod enroll;
pub mod leave;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::course_users::requests::{CourseUserQuery, EnrollRequest};
use crate::storage::Storage;

pub struct CourseUserService {
    storage: Option<Arc<dyn Storage>>,
}

impl CourseUserService {
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

    /// 学生通过入班码加入课程
    pub async fn enroll(
        &self,
        request: &HttpRequest,
        course_id: i64,
        enroll_data: EnrollRequest,
    ) -> ActixResult<HttpResponse> {
        enroll::enroll_course(self, request, course_id, enroll_data).await
    }

    /// 列出课程成员
    pub async fn list_members(
        &self,
        request: &HttpRequest,
        course_id: i64,
        query: CourseUserQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_members(self, request, course_id, query).await
    }

    /// 退课/移除成员
    pub async fn remove_member(
        &self,
        request: &HttpRequest,
        course_id: i64,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        leave::remove_member(self, request, course_id, user_id).await
    }
}
