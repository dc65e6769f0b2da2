use crate::dto::{RemoveProblemFromSetRequest, RemoveProblemFromSetResponse};
use crate::error::AppResult;
use crate::infrastructure::Repositories;
use crate::services::ProblemSetAccess;
use crate::use_cases::{load_problem_set, load_requester, require_field};
use tracing::{debug, info};

/// 从题集移除题目
pub struct RemoveProblemFromSetUseCase {
    repos: Repositories,
}

impl RemoveProblemFromSetUseCase {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn execute(
        &self,
        request: RemoveProblemFromSetRequest,
    ) -> AppResult<RemoveProblemFromSetResponse> {
        debug!("从题集 {} 移除题目 {}", request.problem_set_id, request.problem_id);
        require_field(&request.problem_id, "problemId")?;

        let requester = load_requester(&self.repos, &request.requester_id).await?;
        let mut problem_set = load_problem_set(&self.repos, &request.problem_set_id).await?;
        ProblemSetAccess::evaluate(&problem_set, &requester).require_edit(&requester, &problem_set)?;

        let removed = problem_set.remove_item(&request.problem_id)?;
        self.repos.problem_sets.save(&problem_set).await?;
        info!(
            "✓ 题目 {} 已从题集 {} 移除 (剩余 {} 题)",
            removed.problem_id,
            problem_set.id,
            problem_set.item_count()
        );

        Ok(RemoveProblemFromSetResponse {
            problem_set_id: problem_set.id.clone(),
            removed_problem_id: removed.problem_id,
            item_count: problem_set.item_count(),
            total_points: problem_set.total_points(),
        })
    }
}
