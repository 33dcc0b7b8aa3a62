//! 课程成员存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::course_users::{ActiveModel, Column, Entity as CourseUsers};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{CourseHubError, Result};
use crate::models::{
    PaginationInfo,
    course_users::{
        entities::{CourseUser, CourseUserRole},
        requests::CourseUserQuery,
        responses::{CourseUserListItem, CourseUserListResponse},
    },
    courses::entities::Course,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 选课；并发选课由 (course_id, user_id) 唯一索引串行化，
    /// 失败方的唯一约束冲突映射为 Conflict
    pub async fn enroll_course_impl(
        &self,
        user_id: i64,
        course_id: i64,
        role: CourseUserRole,
    ) -> Result<CourseUser> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(course_id),
            user_id: Set(user_id),
            role: Set(role.to_string()),
            joined_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            let err = CourseHubError::database_operation(format!("选课失败: {e}"));
            if err.is_unique_violation() {
                CourseHubError::conflict("用户已加入该课程")
            } else {
                err
            }
        })?;

        result.into_course_user()
    }

    /// 根据课程ID和入班码获取课程及成员信息（一次往返）
    pub async fn get_course_and_course_user_by_course_id_and_code_impl(
        &self,
        course_id: i64,
        entry_code: &str,
        user_id: i64,
    ) -> Result<(Option<Course>, Option<CourseUser>)> {
        let course = match self.get_course_by_id_impl(course_id).await? {
            // 码不匹配视同课程不存在，不泄露课程是否存在
            Some(course) if course.entry_code == entry_code.trim().to_uppercase() => Some(course),
            _ => return Ok((None, None)),
        };

        let course_user = self
            .get_course_user_by_user_id_and_course_id_impl(user_id, course_id)
            .await?;

        Ok((course, course_user))
    }

    /// 获取用户在课程中的成员信息
    pub async fn get_course_user_by_user_id_and_course_id_impl(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> Result<Option<CourseUser>> {
        let result = CourseUsers::find()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询课程成员失败: {e}")))?;

        result.map(|m| m.into_course_user()).transpose()
    }

    /// 分页列出课程成员
    pub async fn list_course_users_with_pagination_impl(
        &self,
        course_id: i64,
        query: CourseUserQuery,
    ) -> Result<CourseUserListResponse> {
        let page = query.pagination.page.max(1) as u64;
        let size = query.pagination.size.clamp(1, 100) as u64;

        let mut select = CourseUsers::find().filter(Column::CourseId.eq(course_id));

        // 角色筛选
        if let Some(ref role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        // 排序
        select = select.order_by_asc(Column::JoinedAt);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            CourseHubError::database_operation(format!("查询成员总数失败: {e}"))
        })?;

        let pages = paginator.num_pages().await.map_err(|e| {
            CourseHubError::database_operation(format!("查询成员页数失败: {e}"))
        })?;

        let members = paginator.fetch_page(page - 1).await.map_err(|e| {
            CourseHubError::database_operation(format!("查询成员列表失败: {e}"))
        })?;

        // 批量查询用户信息
        let user_ids: Vec<i64> = members.iter().map(|m| m.user_id).collect();
        let users = Users::find()
            .filter(UserColumn::Id.is_in(user_ids))
            .all(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询用户信息失败: {e}")))?;

        let user_map: HashMap<i64, _> = users.into_iter().map(|u| (u.id, u)).collect();

        // 组装 CourseUserListItem
        let mut items = Vec::with_capacity(members.len());
        for m in members {
            let user = user_map.get(&m.user_id);
            let course_user = m.into_course_user()?;
            items.push(CourseUserListItem {
                id: course_user.id,
                user_id: course_user.user_id,
                username: user
                    .map(|u| u.username.clone())
                    .unwrap_or_else(|| "未知用户".to_string()),
                display_name: user.and_then(|u| u.display_name.clone()),
                role: course_user.role,
                joined_at: course_user.joined_at,
            });
        }

        Ok(CourseUserListResponse {
            items,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 退课/移除成员
    pub async fn leave_course_impl(&self, user_id: i64, course_id: i64) -> Result<bool> {
        let result = CourseUsers::delete_many()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("退课失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
