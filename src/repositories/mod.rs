//! 仓储接口（端口）
//!
//! 用例层只依赖这些 trait，持久化实现由基础设施层提供。

use crate::error::AppResult;
use crate::models::{Assignment, Problem, ProblemSet, User};
use async_trait::async_trait;

/// 题集仓储
#[async_trait]
pub trait ProblemSetRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<ProblemSet>>;

    /// 新建或覆盖保存
    async fn save(&self, problem_set: &ProblemSet) -> AppResult<()>;

    /// 删除题集，返回是否确实删除了记录
    async fn delete(&self, id: &str) -> AppResult<bool>;

    async fn find_by_teacher_id(&self, teacher_id: &str) -> AppResult<Vec<ProblemSet>>;

    /// 按教师和标题精确查找（标题已规范化）
    async fn find_by_teacher_id_and_title(
        &self,
        teacher_id: &str,
        title: &str,
    ) -> AppResult<Option<ProblemSet>>;

    /// 其他教师共享的题集
    async fn find_shared_problem_sets_excluding_teacher(
        &self,
        teacher_id: &str,
    ) -> AppResult<Vec<ProblemSet>>;

    async fn find_public_problem_sets(&self) -> AppResult<Vec<ProblemSet>>;

    async fn find_shared_problem_sets(&self) -> AppResult<Vec<ProblemSet>>;
}

/// 题目仓储
#[async_trait]
pub trait ProblemRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Problem>>;

    /// 批量查找，不存在的ID直接忽略
    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Problem>>;

    async fn find_by_teacher_id(&self, teacher_id: &str) -> AppResult<Vec<Problem>>;

    async fn save(&self, problem: &Problem) -> AppResult<()>;
}

/// 用户仓储
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;

    async fn save(&self, user: &User) -> AppResult<()>;
}

/// 作业仓储
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Assignment>>;

    async fn find_by_problem_set_id(&self, problem_set_id: &str) -> AppResult<Vec<Assignment>>;

    async fn save(&self, assignment: &Assignment) -> AppResult<()>;
}
