use crate::dto::{DeleteProblemSetRequest, DeleteProblemSetResponse};
use crate::error::{AppError, AppResult, BusinessError};
use crate::infrastructure::Repositories;
use crate::services::ProblemSetAccess;
use crate::use_cases::{load_problem_set, load_requester};
use tracing::{debug, info, warn};

/// 删除题集
///
/// 存在进行中的作业时默认拒绝删除；`force = true` 时照常删除，并在响应中带回警告。
pub struct DeleteProblemSetUseCase {
    repos: Repositories,
}

impl DeleteProblemSetUseCase {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn execute(&self, request: DeleteProblemSetRequest) -> AppResult<DeleteProblemSetResponse> {
        debug!(
            "删除题集 {} (请求者 {}, force={})",
            request.problem_set_id, request.requester_id, request.force
        );

        let requester = load_requester(&self.repos, &request.requester_id).await?;
        let problem_set = load_problem_set(&self.repos, &request.problem_set_id).await?;
        ProblemSetAccess::evaluate(&problem_set, &requester).require_delete(&requester, &problem_set)?;

        let assignments = self
            .repos
            .assignments
            .find_by_problem_set_id(&problem_set.id)
            .await?;
        let active: Vec<_> = assignments.iter().filter(|a| a.is_active()).collect();

        let warnings: Vec<String> = active
            .iter()
            .map(|a| format!("作业 \"{}\" ({}) 正在进行中", a.title, a.id))
            .collect();
        let affected_assignment_ids: Vec<String> = active.iter().map(|a| a.id.clone()).collect();

        if !warnings.is_empty() {
            if !request.force {
                warn!(
                    "题集 {} 被 {} 个进行中的作业引用，拒绝删除",
                    problem_set.id,
                    warnings.len()
                );
                return Err(BusinessError::ActiveAssignments { warnings }.into());
            }
            warn!(
                "强制删除题集 {}，影响 {} 个进行中的作业",
                problem_set.id,
                warnings.len()
            );
        }

        if !self.repos.problem_sets.delete(&problem_set.id).await? {
            return Err(AppError::problem_set_not_found(&problem_set.id));
        }
        info!("✓ 题集已删除: {} \"{}\"", problem_set.id, problem_set.title);

        Ok(DeleteProblemSetResponse {
            deleted_id: problem_set.id,
            warnings,
            affected_assignment_ids,
        })
    }
}
