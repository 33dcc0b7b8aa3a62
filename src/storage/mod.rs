use std::sync::Arc;

use crate::models::{
    assignments::{
        entities::Assignment,
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentListResponse,
        rubric::Rubric,
    },
    course_users::{
        entities::{CourseUser, CourseUserRole},
        requests::CourseUserQuery,
        responses::CourseUserListResponse,
    },
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::CourseListResponse,
    },
    files::entities::File,
    grades::{
        entities::Grade,
        requests::{GradeListQuery, GradeSubmissionRequest},
        responses::GradeListResponse,
    },
    submissions::{
        entities::Submission,
        requests::{CreateSubmissionRequest, SubmissionListQuery},
        responses::{SubmissionListResponse, SubmissionSummaryResponse},
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest},
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（密码已哈希）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 更新用户资料
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 用户总数（用于启动时初始化管理员）
    async fn count_users(&self) -> Result<u64>;

    /// 课程管理方法
    // 创建课程（入班码自动生成，冲突时重试）
    async fn create_course(
        &self,
        instructor_id: i64,
        course: CreateCourseRequest,
    ) -> Result<Course>;
    // 通过ID获取课程信息
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>>;
    // 通过入班码获取课程信息（大小写不敏感）
    async fn get_course_by_code(&self, entry_code: &str) -> Result<Option<Course>>;
    // 列出课程
    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse>;
    // 列出用户已加入的课程
    async fn list_user_courses_with_pagination(
        &self,
        user_id: i64,
        query: CourseListQuery,
    ) -> Result<CourseListResponse>;
    // 更新课程信息
    async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>>;
    // 删除课程（级联删除作业与提交）
    async fn delete_course(&self, course_id: i64) -> Result<bool>;

    /// 课程成员管理方法
    // 选课；(course_id, user_id) 冲突映射为 Conflict
    async fn enroll_course(
        &self,
        user_id: i64,
        course_id: i64,
        role: CourseUserRole,
    ) -> Result<CourseUser>;
    // 根据课程ID和入班码获取课程及成员信息（一次往返）
    async fn get_course_and_course_user_by_course_id_and_code(
        &self,
        course_id: i64,
        entry_code: &str,
        user_id: i64,
    ) -> Result<(Option<Course>, Option<CourseUser>)>;
    // 获取用户在课程中的成员信息
    async fn get_course_user_by_user_id_and_course_id(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> Result<Option<CourseUser>>;
    // 列出课程成员
    async fn list_course_users_with_pagination(
        &self,
        course_id: i64,
        query: CourseUserQuery,
    ) -> Result<CourseUserListResponse>;
    // 退课/移除成员
    async fn leave_course(&self, user_id: i64, course_id: i64) -> Result<bool>;

    /// 作业管理方法
    // 创建作业（评分标准已在服务层校验归一化）
    async fn create_assignment(
        &self,
        created_by: i64,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment>;
    // 通过ID获取作业
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    // 列出作业
    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse>;
    // 更新作业（评分标准锁定检查在服务层）
    async fn update_assignment(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    // 全量替换评分标准（导入）
    async fn replace_rubric(
        &self,
        assignment_id: i64,
        rubric: Rubric,
    ) -> Result<Option<Assignment>>;
    // 发布作业
    async fn publish_assignment(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    // 删除作业
    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool>;
    // 作业提交数（派生值，不存计数器）
    async fn count_submissions_for_assignment(&self, assignment_id: i64) -> Result<u64>;

    /// 提交管理方法
    // 创建提交（自动计算版本号；版本冲突映射为 Conflict）
    async fn create_submission(
        &self,
        student_id: i64,
        req: CreateSubmissionRequest,
        is_late: bool,
    ) -> Result<Submission>;
    // 通过ID获取提交
    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>>;
    // 获取学生某作业的最新提交
    async fn get_latest_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    // 获取学生某作业的提交历史
    async fn list_user_submissions(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Vec<Submission>>;
    // 列出提交（分页）
    async fn list_submissions_with_pagination(
        &self,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse>;
    // 删除/撤回提交
    async fn delete_submission(&self, submission_id: i64) -> Result<bool>;
    // 作业提交概览（按学生聚合）
    async fn get_submission_summary(
        &self,
        assignment_id: i64,
        page: i64,
        size: i64,
    ) -> Result<SubmissionSummaryResponse>;

    /// 评分方法
    // 首次评分：submitted -> graded 条件更新 + 插入评分，同一事务；
    // 并发评分失败方收到 Conflict
    async fn grade_submission(
        &self,
        grader_id: i64,
        submission_id: i64,
        score: f64,
        req: GradeSubmissionRequest,
    ) -> Result<Grade>;
    // 重新评分：仅 graded 状态允许，替换明细不推进状态
    async fn regrade_submission(
        &self,
        grader_id: i64,
        submission_id: i64,
        score: f64,
        req: GradeSubmissionRequest,
    ) -> Result<Grade>;
    // 返还：graded -> returned 条件更新
    async fn return_submission(&self, submission_id: i64) -> Result<Submission>;
    // 通过提交ID获取评分
    async fn get_grade_by_submission_id(&self, submission_id: i64) -> Result<Option<Grade>>;
    // 列出评分（分页）
    async fn list_grades_with_pagination(
        &self,
        query: GradeListQuery,
    ) -> Result<GradeListResponse>;

    /// 文件管理方法
    // 记录已落盘的文件元数据
    async fn create_file(
        &self,
        original_name: &str,
        stored_name: &str,
        file_size: i64,
        file_type: &str,
        user_id: i64,
    ) -> Result<File>;
    // 通过唯一 token 获取文件信息
    async fn get_file_by_token(&self, download_token: &str) -> Result<Option<File>>;
    // 设置提交附件（通过 download_token，带所有权校验）
    async fn set_submission_files(
        &self,
        submission_id: i64,
        tokens: Vec<String>,
        user_id: i64,
    ) -> Result<()>;
    // 获取提交附件 token 列表
    async fn get_submission_file_tokens(&self, submission_id: i64) -> Result<Vec<String>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
