//! 评分存储操作
//!
//! submitted -> graded 与 graded -> returned 都是状态列上的条件更新，
//! 与评分行的写入在同一事务内完成；条件更新影响 0 行即并发输家，
//! 调用方收到 Conflict 后需重读重试。

use super::SeaOrmStorage;
use crate::entity::grades::{ActiveModel, Column, Entity as Grades};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{CourseHubError, Result};
use crate::models::{
    PaginationInfo,
    grades::{
        entities::Grade,
        requests::{GradeListQuery, GradeSubmissionRequest},
        responses::GradeListResponse,
    },
    submissions::entities::{Submission, SubmissionStatus},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set, TransactionTrait,
};

fn serialize_scores(req: &GradeSubmissionRequest) -> Result<String> {
    serde_json::to_string(&req.scores_by_criterion)
        .map_err(|e| CourseHubError::serialization(format!("评分明细序列化失败: {e}")))
}

impl SeaOrmStorage {
    /// 首次评分：submitted -> graded
    ///
    /// 状态条件更新和评分行插入在同一事务；并发评分者中只有一个能
    /// 完成状态转换，输家收到 Conflict。
    pub async fn grade_submission_impl(
        &self,
        grader_id: i64,
        submission_id: i64,
        score: f64,
        req: GradeSubmissionRequest,
    ) -> Result<Grade> {
        let now = chrono::Utc::now().timestamp();
        let scores_json = serialize_scores(&req)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("开启事务失败: {e}")))?;

        let advanced = self
            .update_submission_status_cas(
                &txn,
                submission_id,
                SubmissionStatus::Submitted,
                SubmissionStatus::Graded,
            )
            .await?;

        if !advanced {
            txn.rollback()
                .await
                .map_err(|e| CourseHubError::database_operation(format!("回滚事务失败: {e}")))?;

            // 区分提交不存在和状态不允许
            return match self.get_submission_by_id_impl(submission_id).await? {
                None => Err(CourseHubError::not_found(format!(
                    "提交不存在: {submission_id}"
                ))),
                Some(sub) => Err(CourseHubError::conflict(format!(
                    "提交当前状态为 {}，无法进行首次评分",
                    sub.status
                ))),
            };
        }

        let model = ActiveModel {
            submission_id: Set(submission_id),
            grader_id: Set(grader_id),
            score: Set(score),
            criterion_scores: Set(scores_json),
            feedback: Set(req.feedback),
            plagiarism_score: Set(req.plagiarism_score),
            graded_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("创建评分失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("提交事务失败: {e}")))?;

        result.into_grade()
    }

    /// 重新评分：仅 graded 状态允许，替换明细，不推进状态
    pub async fn regrade_submission_impl(
        &self,
        grader_id: i64,
        submission_id: i64,
        score: f64,
        req: GradeSubmissionRequest,
    ) -> Result<Grade> {
        let now = chrono::Utc::now().timestamp();
        let scores_json = serialize_scores(&req)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("开启事务失败: {e}")))?;

        // 事务内读取状态，避免与 return 并发交错
        let submission = Submissions::find_by_id(submission_id)
            .one(&txn)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询提交失败: {e}")))?
            .ok_or_else(|| CourseHubError::not_found(format!("提交不存在: {submission_id}")))?;

        if submission.status != SubmissionStatus::Graded.to_string() {
            txn.rollback()
                .await
                .map_err(|e| CourseHubError::database_operation(format!("回滚事务失败: {e}")))?;
            return Err(CourseHubError::conflict(format!(
                "提交当前状态为 {}，仅已评分的提交可以重新评分",
                submission.status
            )));
        }

        let updated = Grades::update_many()
            .col_expr(Column::GraderId, sea_orm::sea_query::Expr::value(grader_id))
            .col_expr(Column::Score, sea_orm::sea_query::Expr::value(score))
            .col_expr(
                Column::CriterionScores,
                sea_orm::sea_query::Expr::value(scores_json),
            )
            .col_expr(
                Column::Feedback,
                sea_orm::sea_query::Expr::value(req.feedback),
            )
            .col_expr(
                Column::PlagiarismScore,
                sea_orm::sea_query::Expr::value(req.plagiarism_score),
            )
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::SubmissionId.eq(submission_id))
            .exec(&txn)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("更新评分失败: {e}")))?;

        if updated.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| CourseHubError::database_operation(format!("回滚事务失败: {e}")))?;
            return Err(CourseHubError::not_found(format!(
                "评分记录不存在: {submission_id}"
            )));
        }

        txn.commit()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_grade_by_submission_id_impl(submission_id)
            .await?
            .ok_or_else(|| CourseHubError::not_found(format!("评分记录不存在: {submission_id}")))
    }

    /// 返还：graded -> returned，终态
    pub async fn return_submission_impl(&self, submission_id: i64) -> Result<Submission> {
        let advanced = self
            .update_submission_status_cas(
                &self.db,
                submission_id,
                SubmissionStatus::Graded,
                SubmissionStatus::Returned,
            )
            .await?;

        if !advanced {
            return match self.get_submission_by_id_impl(submission_id).await? {
                None => Err(CourseHubError::not_found(format!(
                    "提交不存在: {submission_id}"
                ))),
                Some(sub) if sub.status == SubmissionStatus::Submitted => Err(
                    CourseHubError::validation("提交尚未评分，无法返还"),
                ),
                Some(_) => Err(CourseHubError::conflict("提交已返还")),
            };
        }

        self.get_submission_by_id_impl(submission_id)
            .await?
            .ok_or_else(|| CourseHubError::not_found(format!("提交不存在: {submission_id}")))
    }

    /// 通过提交 ID 获取评分
    pub async fn get_grade_by_submission_id_impl(
        &self,
        submission_id: i64,
    ) -> Result<Option<Grade>> {
        let result = Grades::find()
            .filter(Column::SubmissionId.eq(submission_id))
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询评分失败: {e}")))?;

        result.map(|m| m.into_grade()).transpose()
    }

    /// 列出评分（分页）
    pub async fn list_grades_with_pagination_impl(
        &self,
        query: GradeListQuery,
    ) -> Result<GradeListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(20).clamp(1, 100) as u64;

        let mut select = Grades::find();

        // 如果指定了 assignment_id，需要 join submissions 表
        if let Some(assignment_id) = query.assignment_id {
            select = select
                .join(
                    JoinType::InnerJoin,
                    crate::entity::grades::Relation::Submission.def(),
                )
                .filter(SubmissionColumn::AssignmentId.eq(assignment_id));
        }

        // 提交筛选
        if let Some(submission_id) = query.submission_id {
            select = select.filter(Column::SubmissionId.eq(submission_id));
        }

        // 评分者筛选
        if let Some(grader_id) = query.grader_id {
            select = select.filter(Column::GraderId.eq(grader_id));
        }

        // 排序
        select = select.order_by_desc(Column::GradedAt);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询评分总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询评分页数失败: {e}")))?;

        let grades = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询评分列表失败: {e}")))?;

        let items = grades
            .into_iter()
            .map(|m| m.into_grade())
            .collect::<Result<Vec<_>>>()?;

        Ok(GradeListResponse {
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
