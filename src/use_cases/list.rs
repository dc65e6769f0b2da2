use crate::config::Config;
use crate::dto::{
    paginate, sort_problem_sets, ListProblemSetsRequest, ListScope, ProblemSetDto, ProblemSetListResponse,
};
use crate::error::{AppResult, PermissionError};
use crate::infrastructure::Repositories;
use crate::models::{Problem, ProblemSet};
use crate::use_cases::load_requester;
use std::collections::HashMap;
use tracing::{debug, warn};

/// 按范围分页列出题集
pub struct ListProblemSetsUseCase {
    repos: Repositories,
    config: Config,
}

impl ListProblemSetsUseCase {
    pub fn new(repos: Repositories, config: &Config) -> Self {
        Self {
            repos,
            config: config.clone(),
        }
    }

    pub async fn execute(&self, request: ListProblemSetsRequest) -> AppResult<ProblemSetListResponse> {
        debug!(
            "列出题集: 请求者 {} 范围 {:?} 教师 {:?}",
            request.requester_id, request.scope, request.teacher_id
        );

        let (page, limit) = request.page.resolve(&self.config)?;
        let requester = load_requester(&self.repos, &request.requester_id).await?;
        let teacher_filter = request.teacher_id.as_deref().filter(|t| !t.trim().is_empty());

        let mut sets = match request.scope {
            ListScope::Own => {
                let teacher_id = teacher_filter.unwrap_or(requester.id.as_str());
                if teacher_id != requester.id && !requester.is_admin() {
                    warn!("用户 {} 尝试列出教师 {} 的题集被拒绝", requester.id, teacher_id);
                    return Err(PermissionError::RoleNotAllowed {
                        user_id: requester.id.clone(),
                        role: requester.role.to_string(),
                        action: "查看其他教师的题集",
                    }
                    .into());
                }
                self.repos.problem_sets.find_by_teacher_id(teacher_id).await?
            }
            ListScope::Shared => {
                self.repos
                    .problem_sets
                    .find_shared_problem_sets_excluding_teacher(&requester.id)
                    .await?
            }
            ListScope::Public => self.repos.problem_sets.find_public_problem_sets().await?,
        };

        if let (ListScope::Shared | ListScope::Public, Some(teacher_id)) = (request.scope, teacher_filter) {
            sets.retain(|s| s.teacher_id == teacher_id);
        }

        sort_problem_sets(&mut sets, request.sort_by, request.sort_order);
        let (page_sets, pagination) = paginate(sets, page, limit);
        let problem_sets = summaries(&self.repos, &page_sets).await?;

        Ok(ProblemSetListResponse {
            problem_sets,
            pagination,
        })
    }
}

/// 把一页题集映射为概要 DTO（一次性加载这一页涉及的全部题目）
pub(crate) async fn summaries(repos: &Repositories, sets: &[ProblemSet]) -> AppResult<Vec<ProblemSetDto>> {
    let mut ids: Vec<String> = sets
        .iter()
        .flat_map(|s| s.items.iter().map(|i| i.problem_id.clone()))
        .collect();
    ids.sort();
    ids.dedup();

    let problems: HashMap<String, Problem> = repos
        .problems
        .find_by_ids(&ids)
        .await?
        .into_iter()
        .map(|p| (p.id.clone(), p))
        .collect();

    Ok(sets.iter().map(|s| ProblemSetDto::from_entity(s, &problems)).collect())
}
