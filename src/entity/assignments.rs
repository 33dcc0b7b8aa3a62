//! 作业实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub created_by: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    // 评分标准 JSON（已归一化）
    #[sea_orm(column_type = "Text")]
    pub rubric: String,
    // 冗余存储的总分，始终等于评分标准推导值
    pub total_points: f64,
    pub due_date: Option<i64>,
    pub submission_type: String,
    // 允许的扩展名 JSON 数组
    #[sea_orm(column_type = "Text", nullable)]
    pub allowed_extensions: Option<String>,
    pub max_file_size: Option<i64>,
    pub allow_late: bool,
    pub allow_resubmission: bool,
    pub published: bool,
    pub published_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id"
    )]
    Creator,
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_assignment(
        self,
    ) -> crate::errors::Result<crate::models::assignments::entities::Assignment> {
        use crate::errors::CourseHubError;
        use crate::models::assignments::entities::Assignment;
        use chrono::{DateTime, Utc};

        let rubric = serde_json::from_str(&self.rubric)
            .map_err(|e| CourseHubError::serialization(format!("评分标准反序列化失败: {e}")))?;
        let allowed_extensions = match &self.allowed_extensions {
            Some(json) => serde_json::from_str(json)
                .map_err(|e| CourseHubError::serialization(format!("扩展名列表反序列化失败: {e}")))?,
            None => Vec::new(),
        };

        Ok(Assignment {
            id: self.id,
            course_id: self.course_id,
            title: self.title,
            description: self.description,
            rubric,
            total_points: self.total_points,
            due_date: self
                .due_date
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            submission_type: self
                .submission_type
                .parse()
                .map_err(CourseHubError::serialization)?,
            allowed_extensions,
            max_file_size: self.max_file_size,
            allow_late: self.allow_late,
            allow_resubmission: self.allow_resubmission,
            published: self.published,
            published_at: self
                .published_at
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            created_by: self.created_by,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        })
    }
}
