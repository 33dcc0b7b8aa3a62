//! 作业存储操作

use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{CourseHubError, Result};
use crate::models::{
    PaginationInfo,
    assignments::{
        entities::Assignment,
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentListResponse,
        rubric::Rubric,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

fn serialize_rubric(rubric: &Rubric) -> Result<String> {
    serde_json::to_string(rubric)
        .map_err(|e| CourseHubError::serialization(format!("评分标准序列化失败: {e}")))
}

impl SeaOrmStorage {
    /// 创建作业；评分标准已在服务层校验归一化，总分由其推导
    pub async fn create_assignment_impl(
        &self,
        created_by: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();
        let total_points = req.rubric.total_points();
        let rubric_json = serialize_rubric(&req.rubric)?;
        let allowed_extensions = if req.allowed_extensions.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&req.allowed_extensions).map_err(|e| {
                CourseHubError::serialization(format!("扩展名列表序列化失败: {e}"))
            })?)
        };

        let model = ActiveModel {
            course_id: Set(req.course_id),
            created_by: Set(created_by),
            title: Set(req.title),
            description: Set(req.description),
            rubric: Set(rubric_json),
            total_points: Set(total_points),
            due_date: Set(req.due_date.map(|d| d.timestamp())),
            submission_type: Set(req.submission_type.to_string()),
            allowed_extensions: Set(allowed_extensions),
            max_file_size: Set(req.max_file_size),
            allow_late: Set(req.allow_late),
            allow_resubmission: Set(req.allow_resubmission),
            published: Set(false),
            published_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("创建作业失败: {e}")))?;

        result.into_assignment()
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询作业失败: {e}")))?;

        result.map(|m| m.into_assignment()).transpose()
    }

    /// 分页列出作业
    pub async fn list_assignments_with_pagination_impl(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Assignments::find();

        // 课程筛选
        if let Some(course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }

        // 创建者筛选
        if let Some(created_by) = query.created_by {
            select = select.filter(Column::CreatedBy.eq(created_by));
        }

        // 学生视角只看已发布
        if query.published_only.unwrap_or(false) {
            select = select.filter(Column::Published.eq(true));
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::Title.contains(&escaped));
        }

        // 排序
        select = select.order_by_desc(Column::CreatedAt);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询作业总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询作业页数失败: {e}")))?;

        let assignments = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询作业列表失败: {e}")))?;

        let items = assignments
            .into_iter()
            .map(|m| m.into_assignment())
            .collect::<Result<Vec<_>>>()?;

        Ok(AssignmentListResponse {
            items,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 更新作业；rubric 变更同时刷新冗余的 total_points
    pub async fn update_assignment_impl(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        // 先检查作业是否存在
        let existing = self.get_assignment_by_id_impl(assignment_id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(assignment_id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }

        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        if let Some(ref rubric) = update.rubric {
            model.rubric = Set(serialize_rubric(rubric)?);
            model.total_points = Set(rubric.total_points());
        }

        if let Some(due_date) = update.due_date {
            model.due_date = Set(Some(due_date.timestamp()));
        }

        if let Some(submission_type) = update.submission_type {
            model.submission_type = Set(submission_type.to_string());
        }

        if let Some(allowed_extensions) = update.allowed_extensions {
            let json = if allowed_extensions.is_empty() {
                None
            } else {
                Some(serde_json::to_string(&allowed_extensions).map_err(|e| {
                    CourseHubError::serialization(format!("扩展名列表序列化失败: {e}"))
                })?)
            };
            model.allowed_extensions = Set(json);
        }

        if let Some(max_file_size) = update.max_file_size {
            model.max_file_size = Set(Some(max_file_size));
        }

        if let Some(allow_late) = update.allow_late {
            model.allow_late = Set(allow_late);
        }

        if let Some(allow_resubmission) = update.allow_resubmission {
            model.allow_resubmission = Set(allow_resubmission);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("更新作业失败: {e}")))?;

        self.get_assignment_by_id_impl(assignment_id).await
    }

    /// 全量替换评分标准（导入路径），同时刷新总分
    pub async fn replace_rubric_impl(
        &self,
        assignment_id: i64,
        rubric: Rubric,
    ) -> Result<Option<Assignment>> {
        let existing = self.get_assignment_by_id_impl(assignment_id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            id: Set(assignment_id),
            rubric: Set(serialize_rubric(&rubric)?),
            total_points: Set(rubric.total_points()),
            updated_at: Set(now),
            ..Default::default()
        };

        model
            .update(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("替换评分标准失败: {e}")))?;

        self.get_assignment_by_id_impl(assignment_id).await
    }

    /// 发布作业；已发布则幂等返回
    pub async fn publish_assignment_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Option<Assignment>> {
        let existing = match self.get_assignment_by_id_impl(assignment_id).await? {
            Some(assignment) => assignment,
            None => return Ok(None),
        };

        if existing.published {
            return Ok(Some(existing));
        }

        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            id: Set(assignment_id),
            published: Set(true),
            published_at: Set(Some(now)),
            updated_at: Set(now),
            ..Default::default()
        };

        model
            .update(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("发布作业失败: {e}")))?;

        self.get_assignment_by_id_impl(assignment_id).await
    }

    /// 删除作业
    pub async fn delete_assignment_impl(&self, assignment_id: i64) -> Result<bool> {
        let result = Assignments::delete_by_id(assignment_id)
            .exec(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("删除作业失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 作业提交数，读取时派生，不维护计数器字段
    pub async fn count_submissions_for_assignment_impl(&self, assignment_id: i64) -> Result<u64> {
        Submissions::find()
            .filter(SubmissionColumn::AssignmentId.eq(assignment_id))
            .count(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("统计提交数失败: {e}")))
    }
}
