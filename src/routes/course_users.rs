use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::course_users::entities::CourseUserRole;
use crate::models::course_users::requests::{CourseUserQuery, EnrollRequest};
use crate::services::CourseUserService;
use crate::utils::{SafeCourseIdI64, SafeUserIdI64};

// 懒加载的全局 COURSE_USER_SERVICE 实例
static COURSE_USER_SERVICE: Lazy<CourseUserService> = Lazy::new(CourseUserService::new_lazy);

// 通过入班码加入课程
pub async fn enroll(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    body: web::Json<EnrollRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_USER_SERVICE
        .enroll(&req, course_id.0, body.into_inner())
        .await
}

// 列出课程成员
pub async fn list_members(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    query: web::Query<CourseUserQuery>,
) -> ActixResult<HttpResponse> {
    COURSE_USER_SERVICE
        .list_members(&req, course_id.0, query.into_inner())
        .await
}

// 退课/移除成员
pub async fn remove_member(
    req: HttpRequest,
    path: (SafeCourseIdI64, SafeUserIdI64),
) -> ActixResult<HttpResponse> {
    let (course_id, user_id) = path;
    COURSE_USER_SERVICE
        .remove_member(&req, course_id.0, user_id.0)
        .await
}

// 配置路由
pub fn configure_course_users_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses/{course_id}/enroll")
            .wrap(middlewares::RateLimit::entry_code())
            .wrap(middlewares::RequireJWT)
            .route("", web::post().to(enroll)),
    );

    cfg.service(
        web::scope("/api/v1/courses/{course_id}/members")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(
                    web::get()
                        .to(list_members)
                        // 课程成员名单仅教学人员可见
                        .wrap(middlewares::RequireCourseRole::new_any(
                            CourseUserRole::course_staff_roles(),
                        )),
                ),
            )
            .service(web::resource("/{user_id}").route(web::delete().to(remove_member))),
    );
}
