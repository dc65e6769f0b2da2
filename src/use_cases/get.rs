use crate::dto::{GetProblemSetRequest, ProblemSetDetailDto, ProblemSetDto, ProblemSetItemDetailDto};
use crate::error::AppResult;
use crate::infrastructure::Repositories;
use crate::services::ProblemSetAccess;
use crate::use_cases::{load_problem_map, load_problem_set, load_requester};
use tracing::debug;

/// 查询题集详情（含有序条目和题目摘要）
pub struct GetProblemSetUseCase {
    repos: Repositories,
}

impl GetProblemSetUseCase {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn execute(&self, request: GetProblemSetRequest) -> AppResult<ProblemSetDetailDto> {
        debug!("查询题集 {} (请求者 {})", request.problem_set_id, request.requester_id);

        let requester = load_requester(&self.repos, &request.requester_id).await?;
        let problem_set = load_problem_set(&self.repos, &request.problem_set_id).await?;
        let access = ProblemSetAccess::evaluate(&problem_set, &requester);
        access.require_view(&requester, &problem_set)?;

        let problems = load_problem_map(&self.repos, &problem_set).await?;
        let items = problem_set
            .ordered_items()
            .map(|item| {
                let problem = problems.get(&item.problem_id);
                ProblemSetItemDetailDto {
                    item: item.into(),
                    problem_title: problem.map(|p| p.title.clone()),
                    problem_type: problem.map(|p| p.problem_type()),
                }
            })
            .collect();

        Ok(ProblemSetDetailDto {
            summary: ProblemSetDto::from_entity(&problem_set, &problems),
            items,
            is_owner: access.is_owner,
        })
    }
}
