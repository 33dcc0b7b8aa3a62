/*!
 * 基于课程角色的访问控制中间件
 *
 * 此中间件必须在 RequireJWT 中间件之后使用，用于验证用户在路径中
 * `course_id` 对应课程里的成员角色。管理员直接放行。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * web::scope("/api/v1/courses/{course_id}/members")
 *     .wrap(RequireCourseRole::new_any(CourseUserRole::course_staff_roles()))
 *     .wrap(middlewares::RequireJWT)
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};

use crate::{
    models::{
        ErrorCode,
        course_users::entities::{CourseUser, CourseUserRole},
        users::entities::{User, UserRole},
    },
    storage::Storage,
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireCourseRole {
    required_roles: Vec<CourseUserRole>,
    require_all: bool, // true表示需要所有课程角色，false表示任一课程角色即可
}

impl RequireCourseRole {
    /// 创建需要特定课程角色的中间件
    pub fn new(role: &CourseUserRole) -> Self {
        Self {
            required_roles: vec![role.clone()],
            require_all: true,
        }
    }

    /// 创建需要任一课程角色的中间件
    pub fn new_any(roles: &[&CourseUserRole]) -> Self {
        Self {
            required_roles: roles.iter().map(|r| (*r).clone()).collect(),
            require_all: false,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireCourseRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireCourseRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireCourseRoleMiddleware {
            service: Rc::new(service),
            required_roles: self.required_roles.clone(),
            require_all: self.require_all,
        }))
    }
}

pub struct RequireCourseRoleMiddleware<S> {
    service: Rc<S>,
    required_roles: Vec<CourseUserRole>,
    require_all: bool,
}

impl<S, B> Service<ServiceRequest> for RequireCourseRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let required_roles = self.required_roles.clone();
        let require_all = self.require_all;

        Box::pin(async move {
            // 1. 校验用户信息
            let user_claims_opt = req.extensions().get::<User>().cloned();
            let user_claims = match user_claims_opt {
                Some(claims) => claims,
                None => {
                    return Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Unauthorized: missing user claims",
                        )
                        .map_into_right_body(),
                    ));
                }
            };

            // 2. 校验 course_id
            let course_id = match req
                .match_info()
                .get("course_id")
                .and_then(|s| s.parse::<i64>().ok())
            {
                Some(cid) => cid,
                None => {
                    return Ok(req.into_response(
                        create_error_response(
                            StatusCode::BAD_REQUEST,
                            ErrorCode::BadRequest,
                            "Missing or invalid course_id",
                        )
                        .map_into_right_body(),
                    ));
                }
            };

            // 3. 管理员直接放行
            if user_claims.role == UserRole::Admin {
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            // 4. 查询用户在课程中的成员关系和角色
            let course_user = match get_course_user_by_user_id_and_course_id(
                &req,
                user_claims.id,
                course_id,
            )
            .await
            {
                Some(cu) => cu,
                None => {
                    return Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::CoursePermissionDenied,
                            "No permission for this course",
                        )
                        .map_into_right_body(),
                    ));
                }
            };

            // 5. 判断是否拥有所需角色
            let has_permission = if require_all {
                required_roles.iter().all(|role| &course_user.role == role)
            } else {
                required_roles.iter().any(|role| &course_user.role == role)
            };

            if has_permission {
                // 权限通过，插入 course_user 到扩展，继续后续处理
                tracing::debug!("Course user {} has permission", course_user.user_id);
                req.extensions_mut().insert(course_user);
                let res = srv.call(req).await?.map_into_left_body();
                Ok(res)
            } else {
                Ok(req.into_response(
                    create_error_response(
                        StatusCode::FORBIDDEN,
                        ErrorCode::CoursePermissionDenied,
                        "Access denied for this course role",
                    )
                    .map_into_right_body(),
                ))
            }
        })
    }
}

// 辅助函数：从请求中提取课程成员信息
impl RequireCourseRole {
    /// 从请求扩展中提取课程成员信息
    /// 此函数应该在应用了RequireCourseRole中间件的路由处理程序中使用
    pub fn extract_course_user(req: &actix_web::HttpRequest) -> Option<CourseUser> {
        req.extensions().get::<CourseUser>().cloned()
    }
}

async fn get_course_user_by_user_id_and_course_id(
    req: &ServiceRequest,
    user_id: i64,
    course_id: i64,
) -> Option<CourseUser> {
    let storage = req
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .expect("Storage not found in app data")
        .get_ref()
        .clone();

    match storage
        .get_course_user_by_user_id_and_course_id(user_id, course_id)
        .await
    {
        Ok(Some(course_user)) => Some(course_user),
        Ok(None) => None,
        Err(_) => None,
    }
}
