//! 用例层（Application Layer）
//!
//! 每个用例对应一次业务操作，统一形态为 `execute(request) -> AppResult<Response>`：
//!
//! 1. 校验请求字段
//! 2. 加载请求者与题集
//! 3. 通过 `ProblemSetAccess` 检查所有者/管理员权限
//! 4. 修改或查询，重新计算总分、预计用时
//! 5. 保存并映射为响应 DTO
//!
//! 仓储调用按顺序 await，不做跨实体事务。

pub mod add_problem;
pub mod clone_set;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod remove_problem;
pub mod reorder;
pub mod search;
pub mod share;
pub mod statistics;
pub mod update;
pub mod validate_ownership;

pub use add_problem::AddProblemToSetUseCase;
pub use clone_set::CloneProblemSetUseCase;
pub use create::CreateProblemSetUseCase;
pub use delete::DeleteProblemSetUseCase;
pub use get::GetProblemSetUseCase;
pub use list::ListProblemSetsUseCase;
pub use remove_problem::RemoveProblemFromSetUseCase;
pub use reorder::ReorderProblemSetItemsUseCase;
pub use search::SearchProblemSetsUseCase;
pub use share::ShareProblemSetUseCase;
pub use statistics::GetProblemSetStatisticsUseCase;
pub use update::UpdateProblemSetUseCase;
pub use validate_ownership::ValidateProblemSetOwnershipUseCase;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::Repositories;
use crate::models::{Problem, ProblemSet, User};
use std::collections::HashMap;

/// 全部用例的集合，共享同一组仓储和配置
pub struct ProblemSetUseCases {
    pub create: CreateProblemSetUseCase,
    pub get: GetProblemSetUseCase,
    pub update: UpdateProblemSetUseCase,
    pub delete: DeleteProblemSetUseCase,
    pub clone_set: CloneProblemSetUseCase,
    pub share: ShareProblemSetUseCase,
    pub list: ListProblemSetsUseCase,
    pub search: SearchProblemSetsUseCase,
    pub add_problem: AddProblemToSetUseCase,
    pub remove_problem: RemoveProblemFromSetUseCase,
    pub reorder: ReorderProblemSetItemsUseCase,
    pub validate_ownership: ValidateProblemSetOwnershipUseCase,
    pub statistics: GetProblemSetStatisticsUseCase,
}

impl ProblemSetUseCases {
    pub fn new(repos: Repositories, config: &Config) -> Self {
        Self {
            create: CreateProblemSetUseCase::new(repos.clone(), config),
            get: GetProblemSetUseCase::new(repos.clone()),
            update: UpdateProblemSetUseCase::new(repos.clone()),
            delete: DeleteProblemSetUseCase::new(repos.clone()),
            clone_set: CloneProblemSetUseCase::new(repos.clone()),
            share: ShareProblemSetUseCase::new(repos.clone()),
            list: ListProblemSetsUseCase::new(repos.clone(), config),
            search: SearchProblemSetsUseCase::new(repos.clone(), config),
            add_problem: AddProblemToSetUseCase::new(repos.clone(), config),
            remove_problem: RemoveProblemFromSetUseCase::new(repos.clone()),
            reorder: ReorderProblemSetItemsUseCase::new(repos.clone()),
            validate_ownership: ValidateProblemSetOwnershipUseCase::new(repos.clone()),
            statistics: GetProblemSetStatisticsUseCase::new(repos),
        }
    }
}

// ========== 用例共用的加载与校验 ==========

pub(crate) fn require_field(value: &str, field: &'static str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::required(field));
    }
    Ok(())
}

pub(crate) async fn load_requester(repos: &Repositories, requester_id: &str) -> AppResult<User> {
    require_field(requester_id, "requesterId")?;
    repos
        .users
        .find_by_id(requester_id)
        .await?
        .ok_or_else(|| AppError::user_not_found(requester_id))
}

pub(crate) async fn load_problem_set(repos: &Repositories, problem_set_id: &str) -> AppResult<ProblemSet> {
    require_field(problem_set_id, "problemSetId")?;
    repos
        .problem_sets
        .find_by_id(problem_set_id)
        .await?
        .ok_or_else(|| AppError::problem_set_not_found(problem_set_id))
}

/// 加载题集引用的全部题目，按ID索引
pub(crate) async fn load_problem_map(
    repos: &Repositories,
    problem_set: &ProblemSet,
) -> AppResult<HashMap<String, Problem>> {
    let ids: Vec<String> = problem_set.items.iter().map(|i| i.problem_id.clone()).collect();
    let problems = repos.problems.find_by_ids(&ids).await?;
    Ok(problems.into_iter().map(|p| (p.id.clone(), p)).collect())
}

/// 确认标题在该教师名下未被其他题集占用
pub(crate) async fn ensure_title_available(
    repos: &Repositories,
    teacher_id: &str,
    title: &str,
    exclude_id: Option<&str>,
) -> AppResult<()> {
    match repos.problem_sets.find_by_teacher_id_and_title(teacher_id, title).await? {
        Some(existing) if Some(existing.id.as_str()) != exclude_id => {
            tracing::warn!("教师 {} 的题集标题重复: {}", teacher_id, title);
            Err(AppError::duplicate_title(teacher_id, title))
        }
        _ => Ok(()),
    }
}
