//! 课程存储操作

use super::SeaOrmStorage;
use crate::entity::course_users::Column as CourseUserColumn;
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::errors::{CourseHubError, Result};
use crate::models::{
    PaginationInfo,
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::CourseListResponse,
    },
};
use crate::utils::entry_code::generate_entry_code;
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set,
};

/// 入班码冲突时的重试次数（非加密随机，冲突概率低但非零）
const ENTRY_CODE_RETRIES: usize = 5;

impl SeaOrmStorage {
    /// 创建课程，入班码自动生成，唯一约束冲突时重试
    pub async fn create_course_impl(
        &self,
        instructor_id: i64,
        req: CreateCourseRequest,
    ) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let mut last_err = None;
        for _ in 0..ENTRY_CODE_RETRIES {
            let entry_code = generate_entry_code();

            let model = ActiveModel {
                instructor_id: Set(instructor_id),
                course_number: Set(req.course_number.clone()),
                course_name: Set(req.course_name.clone()),
                term: Set(req.term.clone()),
                year: Set(req.year),
                department: Set(req.department.clone()),
                description: Set(req.description.clone()),
                entry_code: Set(entry_code),
                start_date: Set(req.start_date.timestamp()),
                end_date: Set(req.end_date.timestamp()),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };

            match model.insert(&self.db).await {
                Ok(result) => return Ok(result.into_course()),
                Err(e) => {
                    let err =
                        CourseHubError::database_operation(format!("创建课程失败: {e}"));
                    // 只有入班码撞车才重试，其它错误直接上抛
                    if !err.is_unique_violation() {
                        return Err(err);
                    }
                    last_err = Some(err);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| {
            CourseHubError::database_operation("创建课程失败: 入班码生成重试耗尽")
        }))
    }

    /// 通过 ID 获取课程
    pub async fn get_course_by_id_impl(&self, course_id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 通过入班码获取课程；码存储即为大写，匹配前统一大写
    pub async fn get_course_by_code_impl(&self, entry_code: &str) -> Result<Option<Course>> {
        let result = Courses::find()
            .filter(Column::EntryCode.eq(entry_code.trim().to_uppercase()))
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 分页列出课程
    pub async fn list_courses_with_pagination_impl(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        let select = Courses::find();
        self.paginate_courses(select, query).await
    }

    /// 分页列出用户已加入的课程
    pub async fn list_user_courses_with_pagination_impl(
        &self,
        user_id: i64,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        let select = Courses::find()
            .join(
                JoinType::InnerJoin,
                crate::entity::courses::Relation::CourseUsers.def(),
            )
            .filter(CourseUserColumn::UserId.eq(user_id));
        self.paginate_courses(select, query).await
    }

    async fn paginate_courses(
        &self,
        mut select: sea_orm::Select<Courses>,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        // 教师筛选
        if let Some(instructor_id) = query.instructor_id {
            select = select.filter(Column::InstructorId.eq(instructor_id));
        }

        // 学年/学期筛选
        if let Some(year) = query.year {
            select = select.filter(Column::Year.eq(year));
        }
        if let Some(ref term) = query.term {
            select = select.filter(Column::Term.eq(term));
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                sea_orm::Condition::any()
                    .add(Column::CourseName.contains(&escaped))
                    .add(Column::CourseNumber.contains(&escaped)),
            );
        }

        // 排序
        select = select.order_by_desc(Column::CreatedAt);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询课程总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询课程页数失败: {e}")))?;

        let courses = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(CourseListResponse {
            items: courses.into_iter().map(|m| m.into_course()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 更新课程信息
    pub async fn update_course_impl(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        // 先检查课程是否存在
        let existing = self.get_course_by_id_impl(course_id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(course_id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(course_name) = update.course_name {
            model.course_name = Set(course_name);
        }

        if let Some(department) = update.department {
            model.department = Set(Some(department));
        }

        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        if let Some(start_date) = update.start_date {
            model.start_date = Set(start_date.timestamp());
        }

        if let Some(end_date) = update.end_date {
            model.end_date = Set(end_date.timestamp());
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("更新课程失败: {e}")))?;

        self.get_course_by_id_impl(course_id).await
    }

    /// 删除课程（作业与提交由外键级联删除）
    pub async fn delete_course_impl(&self, course_id: i64) -> Result<bool> {
        let result = Courses::delete_by_id(course_id)
            .exec(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("删除课程失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
