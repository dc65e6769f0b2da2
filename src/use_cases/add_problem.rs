use crate::config::Config;
use crate::dto::{AddProblemToSetRequest, AddProblemToSetResponse, ProblemSetItemDto};
use crate::error::{AppError, AppResult};
use crate::infrastructure::Repositories;
use crate::services::ProblemSetAccess;
use crate::use_cases::{load_problem_set, load_requester, require_field};
use tracing::{debug, info};

/// 向题集添加题目
pub struct AddProblemToSetUseCase {
    repos: Repositories,
    max_items: usize,
}

impl AddProblemToSetUseCase {
    pub fn new(repos: Repositories, config: &Config) -> Self {
        Self {
            repos,
            max_items: config.item_limit(),
        }
    }

    pub async fn execute(&self, request: AddProblemToSetRequest) -> AppResult<AddProblemToSetResponse> {
        debug!(
            "添加题目 {} 到题集 {} (位置 {:?})",
            request.problem_id, request.problem_set_id, request.position
        );
        require_field(&request.problem_id, "problemId")?;

        let requester = load_requester(&self.repos, &request.requester_id).await?;
        let mut problem_set = load_problem_set(&self.repos, &request.problem_set_id).await?;
        ProblemSetAccess::evaluate(&problem_set, &requester).require_edit(&requester, &problem_set)?;

        let problem = self
            .repos
            .problems
            .find_by_id(&request.problem_id)
            .await?
            .ok_or_else(|| AppError::problem_not_found(&request.problem_id))?;

        let points = request
            .points
            .unwrap_or_else(|| problem.problem_type().default_points());
        let item: ProblemSetItemDto = problem_set
            .add_item(
                problem.id.clone(),
                points,
                request.settings.unwrap_or_default(),
                request.position,
                self.max_items,
            )?
            .into();

        self.repos.problem_sets.save(&problem_set).await?;
        info!(
            "✓ 题目 {} 已加入题集 {} (第 {} 题, {} 分)",
            problem.id,
            problem_set.id,
            item.order_index + 1,
            item.points
        );

        Ok(AddProblemToSetResponse {
            problem_set_id: problem_set.id.clone(),
            item,
            item_count: problem_set.item_count(),
            total_points: problem_set.total_points(),
        })
    }
}
