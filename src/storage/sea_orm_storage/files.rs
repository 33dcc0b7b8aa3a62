//! 文件元数据存储操作
//!
//! blob 先落盘、元数据后入库；上传服务在入库失败时负责清理磁盘文件，
//! 保证不会留下指向不存在 blob 的元数据行。

use super::SeaOrmStorage;
use sea_orm::ExprTrait;
use crate::entity::files::{ActiveModel, Column, Entity as Files};
use crate::entity::submission_files::{
    ActiveModel as SubmissionFileActiveModel, Column as SubmissionFileColumn,
    Entity as SubmissionFiles,
};
use crate::errors::{CourseHubError, Result};
use crate::models::files::entities::File;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

impl SeaOrmStorage {
    /// 记录已落盘的文件元数据
    pub async fn create_file_impl(
        &self,
        original_name: &str,
        stored_name: &str,
        file_size: i64,
        file_type: &str,
        user_id: i64,
    ) -> Result<File> {
        let now = chrono::Utc::now().timestamp();
        let download_token = Uuid::new_v4().to_string();

        let model = ActiveModel {
            download_token: Set(download_token),
            original_name: Set(original_name.to_string()),
            stored_name: Set(stored_name.to_string()),
            file_size: Set(file_size),
            file_type: Set(file_type.to_string()),
            citation_count: Set(0),
            user_id: Set(Some(user_id)),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("记录文件元数据失败: {e}")))?;

        Ok(result.into_file())
    }

    /// 通过唯一 token 获取文件信息
    pub async fn get_file_by_token_impl(&self, download_token: &str) -> Result<Option<File>> {
        let result = Files::find()
            .filter(Column::DownloadToken.eq(download_token))
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询文件失败: {e}")))?;

        Ok(result.map(|m| m.into_file()))
    }

    /// 增加文件引用计数
    pub async fn increment_file_citation_impl(&self, file_id: i64) -> Result<()> {
        Files::update_many()
            .col_expr(
                Column::CitationCount,
                sea_orm::sea_query::Expr::col(Column::CitationCount).add(1),
            )
            .filter(Column::Id.eq(file_id))
            .exec(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("更新引用计数失败: {e}")))?;

        Ok(())
    }

    /// 设置提交附件（通过 download_token，带所有权校验）
    pub async fn set_submission_files_impl(
        &self,
        submission_id: i64,
        tokens: Vec<String>,
        user_id: i64,
    ) -> Result<()> {
        // 先删除旧的关联
        SubmissionFiles::delete_many()
            .filter(SubmissionFileColumn::SubmissionId.eq(submission_id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                CourseHubError::database_operation(format!("删除旧附件关联失败: {e}"))
            })?;

        // 通过 token 查找文件并校验所有权
        for token in tokens {
            let file = self
                .get_file_by_token_impl(&token)
                .await?
                .ok_or_else(|| CourseHubError::not_found(format!("文件不存在: {token}")))?;

            // 校验文件所有权
            if file.user_id != Some(user_id) {
                return Err(CourseHubError::authorization(format!(
                    "无权使用此文件: {token}"
                )));
            }

            let model = SubmissionFileActiveModel {
                submission_id: Set(submission_id),
                file_id: Set(file.id),
            };

            model
                .insert(&self.db)
                .await
                .map_err(|e| CourseHubError::database_operation(format!("创建附件关联失败: {e}")))?;

            // 增加文件引用计数
            self.increment_file_citation_impl(file.id).await?;
        }

        Ok(())
    }

    /// 获取提交附件 token 列表
    pub async fn get_submission_file_tokens_impl(
        &self,
        submission_id: i64,
    ) -> Result<Vec<String>> {
        let links = SubmissionFiles::find()
            .filter(SubmissionFileColumn::SubmissionId.eq(submission_id))
            .all(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询提交附件失败: {e}")))?;

        if links.is_empty() {
            return Ok(Vec::new());
        }

        let file_ids: Vec<i64> = links.iter().map(|m| m.file_id).collect();
        let files = Files::find()
            .filter(Column::Id.is_in(file_ids))
            .all(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询文件失败: {e}")))?;

        Ok(files.into_iter().map(|f| f.download_token).collect())
    }
}
