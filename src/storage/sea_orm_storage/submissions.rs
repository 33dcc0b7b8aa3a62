//! 提交存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::grades::{Column as GradeColumn, Entity as Grades};
use crate::entity::submission_files::{
    Column as SubmissionFileColumn, Entity as SubmissionFiles,
};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{CourseHubError, Result};
use crate::models::{
    PaginationInfo,
    submissions::{
        entities::{Submission, SubmissionStatus},
        requests::{CreateSubmissionRequest, SubmissionListQuery},
        responses::{
            LatestSubmissionInfo, SubmissionGradeInfo, SubmissionListItem, SubmissionListResponse,
            SubmissionSummaryItem, SubmissionSummaryResponse,
        },
    },
    users::responses::UserBrief,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建提交（自动计算版本号）
    ///
    /// 同一 (assignment_id, student_id, version) 上的并发插入由唯一索引
    /// 串行化，失败方收到 Conflict。
    pub async fn create_submission_impl(
        &self,
        student_id: i64,
        req: CreateSubmissionRequest,
        is_late: bool,
    ) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();

        // 查询当前最大版本号
        let max_version = Submissions::find()
            .filter(Column::AssignmentId.eq(req.assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .select_only()
            .column_as(Column::Version.max(), "max_version")
            .into_tuple::<Option<i32>>()
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询最大版本号失败: {e}")))?
            .flatten()
            .unwrap_or(0);

        let version = max_version + 1;

        let model = ActiveModel {
            assignment_id: Set(req.assignment_id),
            student_id: Set(student_id),
            version: Set(version),
            content: Set(req.content),
            status: Set(SubmissionStatus::Submitted.to_string()),
            is_late: Set(is_late),
            submitted_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            let err = CourseHubError::database_operation(format!("创建提交失败: {e}"));
            if err.is_unique_violation() {
                // 两个并发提交抢同一个版本号，输家走到这里
                CourseHubError::conflict("已存在该作业的提交")
            } else {
                err
            }
        })?;

        // 处理附件
        let attachments = req.attachments;
        if !attachments.is_empty() {
            self.set_submission_files_impl(result.id, attachments.clone(), student_id)
                .await?;
        }

        result.into_submission(attachments)
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(
        &self,
        submission_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询提交失败: {e}")))?;

        match result {
            Some(model) => {
                let attachments = self.get_submission_file_tokens_impl(model.id).await?;
                Ok(Some(model.into_submission(attachments)?))
            }
            None => Ok(None),
        }
    }

    /// 获取学生某作业的最新提交
    pub async fn get_latest_submission_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::Version)
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询最新提交失败: {e}")))?;

        match result {
            Some(model) => {
                let attachments = self.get_submission_file_tokens_impl(model.id).await?;
                Ok(Some(model.into_submission(attachments)?))
            }
            None => Ok(None),
        }
    }

    /// 获取学生某作业的提交历史
    pub async fn list_user_submissions_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Vec<Submission>> {
        let results = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::Version)
            .all(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询提交历史失败: {e}")))?;

        let mut submissions = Vec::with_capacity(results.len());
        for model in results {
            let attachments = self.get_submission_file_tokens_impl(model.id).await?;
            submissions.push(model.into_submission(attachments)?);
        }

        Ok(submissions)
    }

    /// 列出提交（分页）
    pub async fn list_submissions_with_pagination_impl(
        &self,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Submissions::find();

        // 作业筛选
        if let Some(assignment_id) = query.assignment_id {
            select = select.filter(Column::AssignmentId.eq(assignment_id));
        }

        // 提交者筛选
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        // 状态筛选
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        // 排序
        select = select.order_by_desc(Column::SubmittedAt);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询提交总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询提交页数失败: {e}")))?;

        let submissions = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询提交列表失败: {e}")))?;

        // 批量查询用户信息
        let student_ids: Vec<i64> = submissions
            .iter()
            .map(|s| s.student_id)
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();

        let users = Users::find()
            .filter(UserColumn::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询用户信息失败: {e}")))?;

        let user_map: HashMap<i64, _> = users.into_iter().map(|u| (u.id, u)).collect();

        // 组装 SubmissionListItem
        let mut items = Vec::with_capacity(submissions.len());
        for s in submissions {
            let student = user_map.get(&s.student_id);
            let status: SubmissionStatus = s
                .status
                .parse()
                .map_err(CourseHubError::serialization)?;
            items.push(SubmissionListItem {
                id: s.id,
                assignment_id: s.assignment_id,
                student: UserBrief {
                    id: s.student_id,
                    username: student
                        .map(|u| u.username.clone())
                        .unwrap_or_else(|| "未知用户".to_string()),
                    display_name: student.and_then(|u| u.display_name.clone()),
                },
                version: s.version,
                status,
                is_late: s.is_late,
                submitted_at: chrono::DateTime::from_timestamp(s.submitted_at, 0)
                    .unwrap_or_default(),
            });
        }

        Ok(SubmissionListResponse {
            items,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 删除提交（撤回）
    pub async fn delete_submission_impl(&self, submission_id: i64) -> Result<bool> {
        // 先删除附件关联
        SubmissionFiles::delete_many()
            .filter(SubmissionFileColumn::SubmissionId.eq(submission_id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                CourseHubError::database_operation(format!("删除提交附件关联失败: {e}"))
            })?;

        let result = Submissions::delete_by_id(submission_id)
            .exec(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("删除提交失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 条件更新提交状态（乐观并发控制的 CAS 形式）
    ///
    /// 只有当前状态等于 `from` 时才推进到 `to`；
    /// 返回 false 表示并发对手先完成了转换。
    pub(crate) async fn update_submission_status_cas(
        &self,
        db: &impl sea_orm::ConnectionTrait,
        submission_id: i64,
        from: SubmissionStatus,
        to: SubmissionStatus,
    ) -> Result<bool> {
        let result = Submissions::update_many()
            .col_expr(
                Column::Status,
                sea_orm::sea_query::Expr::value(to.to_string()),
            )
            .filter(Column::Id.eq(submission_id))
            .filter(Column::Status.eq(from.to_string()))
            .exec(db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("更新提交状态失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 获取作业提交概览（按学生聚合）
    pub async fn get_submission_summary_impl(
        &self,
        assignment_id: i64,
        page: i64,
        size: i64,
    ) -> Result<SubmissionSummaryResponse> {
        let page = page.max(1) as u64;
        let size = size.clamp(1, 100) as u64;

        // 1. 查询该作业所有提交（按版本倒序）
        let all_submissions = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_desc(Column::Version)
            .all(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询提交列表失败: {e}")))?;

        if all_submissions.is_empty() {
            return Ok(SubmissionSummaryResponse {
                items: vec![],
                pagination: PaginationInfo {
                    page: page as i64,
                    page_size: size as i64,
                    total: 0,
                    total_pages: 0,
                },
            });
        }

        // 2. 按学生聚合，取每个学生的最新提交和版本数
        let mut student_latest: HashMap<i64, (&crate::entity::submissions::Model, i32)> =
            HashMap::new();
        for sub in &all_submissions {
            student_latest
                .entry(sub.student_id)
                .and_modify(|(_, count)| *count += 1)
                .or_insert((sub, 1));
        }

        // 3. 分页
        let total = student_latest.len() as u64;
        let pages = total.div_ceil(size);
        let skip = ((page - 1) * size) as usize;

        let mut student_data: Vec<_> = student_latest.into_iter().collect();
        // 按提交时间倒序排序
        student_data.sort_by(|a, b| b.1.0.submitted_at.cmp(&a.1.0.submitted_at));

        let paged_data: Vec<_> = student_data
            .into_iter()
            .skip(skip)
            .take(size as usize)
            .collect();

        // 4. 批量查询用户信息
        let student_ids: Vec<i64> = paged_data.iter().map(|(id, _)| *id).collect();
        let users = Users::find()
            .filter(UserColumn::Id.is_in(student_ids.clone()))
            .all(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询用户信息失败: {e}")))?;
        let user_map: HashMap<i64, _> = users.into_iter().map(|u| (u.id, u)).collect();

        // 5. 批量查询评分信息（根据最新提交 ID）
        let submission_ids: Vec<i64> = paged_data.iter().map(|(_, (sub, _))| sub.id).collect();
        let grades = Grades::find()
            .filter(GradeColumn::SubmissionId.is_in(submission_ids))
            .all(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询评分信息失败: {e}")))?;
        let grade_map: HashMap<i64, _> = grades.into_iter().map(|g| (g.submission_id, g)).collect();

        // 6. 组装结果
        let mut items = Vec::with_capacity(paged_data.len());
        for (student_id, (sub, version_count)) in paged_data {
            let user = user_map.get(&student_id);
            let grade = grade_map.get(&sub.id);
            let status: SubmissionStatus = sub
                .status
                .parse()
                .map_err(CourseHubError::serialization)?;

            items.push(SubmissionSummaryItem {
                student: UserBrief {
                    id: student_id,
                    username: user
                        .map(|u| u.username.clone())
                        .unwrap_or_else(|| "未知用户".to_string()),
                    display_name: user.and_then(|u| u.display_name.clone()),
                },
                latest_submission: LatestSubmissionInfo {
                    id: sub.id,
                    version: sub.version,
                    status,
                    is_late: sub.is_late,
                    submitted_at: chrono::DateTime::from_timestamp(sub.submitted_at, 0)
                        .unwrap_or_default(),
                },
                grade: grade.map(|g| SubmissionGradeInfo {
                    score: g.score,
                    feedback: g.feedback.clone(),
                    graded_at: chrono::DateTime::from_timestamp(g.graded_at, 0)
                        .unwrap_or_default(),
                }),
                total_versions: version_count,
            });
        }

        Ok(SubmissionSummaryResponse {
            items,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }
}
