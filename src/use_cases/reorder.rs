use crate::dto::{ReorderProblemSetItemsRequest, ReorderProblemSetItemsResponse};
use crate::error::AppResult;
use crate::infrastructure::Repositories;
use crate::services::ProblemSetAccess;
use crate::use_cases::{load_problem_set, load_requester};
use tracing::{debug, info};

/// 重排题集条目
///
/// `item_ids` 必须是当前全部条目ID的一个排列，只改变 `order_index`。
pub struct ReorderProblemSetItemsUseCase {
    repos: Repositories,
}

impl ReorderProblemSetItemsUseCase {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn execute(
        &self,
        request: ReorderProblemSetItemsRequest,
    ) -> AppResult<ReorderProblemSetItemsResponse> {
        debug!(
            "重排题集 {} ({} 个条目)",
            request.problem_set_id,
            request.item_ids.len()
        );

        let requester = load_requester(&self.repos, &request.requester_id).await?;
        let mut problem_set = load_problem_set(&self.repos, &request.problem_set_id).await?;
        ProblemSetAccess::evaluate(&problem_set, &requester).require_edit(&requester, &problem_set)?;

        problem_set.reorder_items(&request.item_ids)?;
        self.repos.problem_sets.save(&problem_set).await?;
        info!("✓ 题集 {} 已重新排序", problem_set.id);

        Ok(ReorderProblemSetItemsResponse {
            items: problem_set.ordered_items().map(Into::into).collect(),
            problem_set_id: problem_set.id,
        })
    }
}
